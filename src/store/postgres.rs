//! PostgreSQL adapter over a shared sqlx pool.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::filter::{sql, Predicate};
use crate::models::{
    Event, EventRecord, NewEvent, NewUser, NewVenue, Page, PageRequest, User, Venue, VenueSummary,
};
use crate::store::{EventRepository, UserRepository, VenueRepository};
use crate::utils::error::{AppError, AppResult};

const EVENT_RECORD_SELECT: &str = r#"
    SELECT events.*,
           venues.name AS venue_name,
           venues.address AS venue_address,
           venues.city AS venue_city,
           venues.state AS venue_state,
           users.name AS creator_name
    FROM events
    INNER JOIN venues ON venues.id = events.venue_id
    INNER JOIN users ON users.id = events.created_by
"#;

/// Must be the first statement of the transaction.
const READ_ONLY_SNAPSHOT: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

fn draft_changed(id: Uuid) -> AppError {
    AppError::Conflict(format!("Event {id} is no longer a draft"))
}

/// Row shape shared by the single-event lookup and the search query.
#[derive(FromRow)]
struct EventRow {
    #[sqlx(flatten)]
    event: Event,
    venue_name: String,
    venue_address: String,
    venue_city: String,
    venue_state: String,
    creator_name: String,
}

impl From<EventRow> for EventRecord {
    fn from(row: EventRow) -> Self {
        let venue = VenueSummary {
            id: row.event.venue_id,
            name: row.venue_name,
            address: row.venue_address,
            city: row.venue_city,
            state: row.venue_state,
        };
        Self {
            event: row.event,
            venue,
            creator_name: row.creator_name,
        }
    }
}

fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgStore {
    async fn insert_event(&self, event: NewEvent) -> AppResult<Event> {
        let inserted = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                id, name, description, artist_name, event_date_time, end_date_time,
                price, total_tickets, available_tickets, image_url, status, category,
                venue_id, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.artist_name)
        .bind(event.event_date_time)
        .bind(event.end_date_time)
        .bind(event.price)
        .bind(event.total_tickets)
        .bind(event.available_tickets)
        .bind(&event.image_url)
        .bind(event.status)
        .bind(event.category)
        .bind(event.venue_id)
        .bind(event.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find_event(&self, id: Uuid) -> AppResult<Option<EventRecord>> {
        let query = format!("{EVENT_RECORD_SELECT} WHERE events.id = $1");
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(EventRecord::from))
    }

    async fn update_event(&self, event: &Event) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = $2, description = $3, artist_name = $4, event_date_time = $5,
                end_date_time = $6, price = $7, total_tickets = $8, available_tickets = $9,
                image_url = $10, status = $11, category = $12, venue_id = $13,
                updated_at = $14
            WHERE id = $1 AND status = 'DRAFT'
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.artist_name)
        .bind(event.event_date_time)
        .bind(event.end_date_time)
        .bind(event.price)
        .bind(event.total_tickets)
        .bind(event.available_tickets)
        .bind(&event.image_url)
        .bind(event.status)
        .bind(event.category)
        .bind(event.venue_id)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(draft_changed(event.id));
        }
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_events(
        &self,
        predicate: &Predicate,
        page: &PageRequest,
    ) -> AppResult<Page<EventRecord>> {
        let select = sql::search_statement(predicate, page);
        let count = sql::count_statement(predicate);

        // One snapshot for the page and its total.
        let mut tx = self.pool.begin().await?;
        sqlx::query(READ_ONLY_SNAPSHOT)
            .execute(&mut *tx)
            .await?;
        let rows = sqlx::query_as::<_, EventRow>(&select)
            .fetch_all(&mut *tx)
            .await?;
        let total: i64 = sqlx::query_scalar(&count).fetch_one(&mut *tx).await?;
        tx.commit().await?;

        let items = rows.into_iter().map(EventRecord::from).collect();
        Ok(Page::new(items, page, u64::try_from(total).unwrap_or_default()))
    }

    async fn count_events_for_venue(&self, venue_id: Uuid) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE venue_id = $1")
            .bind(venue_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}

#[async_trait]
impl VenueRepository for PgStore {
    async fn insert_venue(&self, venue: NewVenue) -> AppResult<Venue> {
        let inserted = sqlx::query_as::<_, Venue>(
            r#"
            INSERT INTO venues (
                id, name, address, city, state, zip_code, country, capacity,
                description, image_url, contact_email, contact_phone
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&venue.name)
        .bind(&venue.address)
        .bind(&venue.city)
        .bind(&venue.state)
        .bind(&venue.zip_code)
        .bind(&venue.country)
        .bind(venue.capacity)
        .bind(&venue.description)
        .bind(&venue.image_url)
        .bind(&venue.contact_email)
        .bind(&venue.contact_phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find_venue(&self, id: Uuid) -> AppResult<Option<Venue>> {
        let venue = sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(venue)
    }

    async fn list_venues(&self) -> AppResult<Vec<Venue>> {
        let venues = sqlx::query_as::<_, Venue>("SELECT * FROM venues ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(venues)
    }

    async fn update_venue(&self, venue: &Venue) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE venues
            SET name = $2, address = $3, city = $4, state = $5, zip_code = $6,
                country = $7, capacity = $8, description = $9, image_url = $10,
                contact_email = $11, contact_phone = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(venue.id)
        .bind(&venue.name)
        .bind(&venue.address)
        .bind(&venue.city)
        .bind(&venue.state)
        .bind(&venue.zip_code)
        .bind(&venue.country)
        .bind(venue.capacity)
        .bind(&venue.description)
        .bind(&venue.image_url)
        .bind(&venue.contact_email)
        .bind(&venue.contact_phone)
        .bind(venue.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_venue(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, role, name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Email is already registered"))
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
