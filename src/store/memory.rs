//! In-process adapter. Evaluates search predicates directly against the
//! stored records.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::filter::Predicate;
use crate::models::{
    Event, EventRecord, EventStatus, NewEvent, NewUser, NewVenue, Page, PageRequest,
    SortDirection, SortKey, User, Venue, VenueSummary,
};
use crate::store::{EventRepository, UserRepository, VenueRepository};
use crate::utils::error::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    events: HashMap<Uuid, Event>,
    venues: HashMap<Uuid, Venue>,
    users: HashMap<Uuid, User>,
}

impl Tables {
    /// `None` if the venue or creator row is gone.
    fn record(&self, event: &Event) -> Option<EventRecord> {
        let venue = self.venues.get(&event.venue_id)?;
        let creator = self.users.get(&event.created_by)?;
        Some(EventRecord {
            event: event.clone(),
            venue: VenueSummary::from(venue),
            creator_name: creator.name.clone(),
        })
    }
}

fn compare(a: &Event, b: &Event, key: SortKey) -> Ordering {
    match key {
        SortKey::EventDateTime => a.event_date_time.cmp(&b.event_date_time),
        SortKey::Price => a.price.cmp(&b.price),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn insert_event(&self, event: NewEvent) -> AppResult<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            name: event.name,
            description: event.description,
            artist_name: event.artist_name,
            event_date_time: event.event_date_time,
            end_date_time: event.end_date_time,
            price: event.price,
            total_tickets: event.total_tickets,
            available_tickets: event.available_tickets,
            image_url: event.image_url,
            status: event.status,
            category: event.category,
            venue_id: event.venue_id,
            created_by: event.created_by,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .events
            .insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_event(&self, id: Uuid) -> AppResult<Option<EventRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&id).and_then(|event| tables.record(event)))
    }

    async fn update_event(&self, event: &Event) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        match tables.events.get_mut(&event.id) {
            Some(stored) if stored.status == EventStatus::Draft => {
                *stored = event.clone();
                Ok(())
            }
            _ => Err(AppError::Conflict(format!(
                "Event {} is no longer a draft",
                event.id
            ))),
        }
    }

    async fn delete_event(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.events.remove(&id).is_some())
    }

    async fn search_events(
        &self,
        predicate: &Predicate,
        page: &PageRequest,
    ) -> AppResult<Page<EventRecord>> {
        let tables = self.tables.read().await;

        let mut matches: Vec<EventRecord> = tables
            .events
            .values()
            .filter_map(|event| tables.record(event))
            .filter(|record| predicate.matches(record))
            .collect();

        matches.sort_by(|a, b| {
            let primary = compare(&a.event, &b.event, page.sort.key);
            let primary = match page.sort.direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| a.event.id.cmp(&b.event.id))
        });

        let total = matches.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = matches
            .into_iter()
            .skip(offset)
            .take(page.size as usize)
            .collect();

        Ok(Page::new(items, page, total))
    }

    async fn count_events_for_venue(&self, venue_id: Uuid) -> AppResult<u64> {
        let tables = self.tables.read().await;
        let count = tables
            .events
            .values()
            .filter(|event| event.venue_id == venue_id)
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl VenueRepository for MemoryStore {
    async fn insert_venue(&self, venue: NewVenue) -> AppResult<Venue> {
        let now = Utc::now();
        let venue = Venue {
            id: Uuid::new_v4(),
            name: venue.name,
            address: venue.address,
            city: venue.city,
            state: venue.state,
            zip_code: venue.zip_code,
            country: venue.country,
            capacity: venue.capacity,
            description: venue.description,
            image_url: venue.image_url,
            contact_email: venue.contact_email,
            contact_phone: venue.contact_phone,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .venues
            .insert(venue.id, venue.clone());
        Ok(venue)
    }

    async fn find_venue(&self, id: Uuid) -> AppResult<Option<Venue>> {
        Ok(self.tables.read().await.venues.get(&id).cloned())
    }

    async fn list_venues(&self) -> AppResult<Vec<Venue>> {
        let mut venues: Vec<Venue> = self.tables.read().await.venues.values().cloned().collect();
        venues.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(venues)
    }

    async fn update_venue(&self, venue: &Venue) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.venues.get_mut(&venue.id) {
            *stored = venue.clone();
        }
        Ok(())
    }

    async fn delete_venue(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.venues.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            name: user.name,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|user| user.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(self.find_user_by_email(email).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::EventFilter;
    use crate::models::{EventCategory, EventStatus, Role, Sort};
    use chrono::Duration;
    use rust_decimal::Decimal;

    async fn seeded() -> (MemoryStore, Uuid, Uuid) {
        let store = MemoryStore::new();
        let venue = store
            .insert_venue(NewVenue {
                name: "Moody Center".into(),
                address: "2001 Robert Dedman Dr".into(),
                city: "Austin".into(),
                state: "TX".into(),
                zip_code: "78712".into(),
                country: "USA".into(),
                capacity: 15_000,
                description: None,
                image_url: None,
                contact_email: None,
                contact_phone: None,
            })
            .await
            .unwrap();
        let admin = store
            .insert_user(NewUser {
                email: "admin@example.com".into(),
                password_hash: "hash".into(),
                role: Role::Admin,
                name: "Admin".into(),
            })
            .await
            .unwrap();
        (store, venue.id, admin.id)
    }

    fn new_event(name: &str, venue_id: Uuid, created_by: Uuid, days: i64, price: i64) -> NewEvent {
        NewEvent {
            name: name.into(),
            description: "desc".into(),
            artist_name: None,
            event_date_time: Utc::now() + Duration::days(days),
            end_date_time: None,
            price: Decimal::new(price, 0),
            total_tickets: 100,
            available_tickets: 100,
            image_url: None,
            status: EventStatus::Published,
            category: EventCategory::Music,
            venue_id,
            created_by,
        }
    }

    #[tokio::test]
    async fn search_pages_in_start_order() {
        let (store, venue_id, admin_id) = seeded().await;
        for day in [5, 1, 3, 2, 4] {
            store
                .insert_event(new_event(&format!("day {day}"), venue_id, admin_id, day, 10))
                .await
                .unwrap();
        }

        let predicate = EventFilter::default().to_predicate();
        let page = PageRequest {
            page: 1,
            size: 2,
            sort: Sort::default(),
        };
        let result = store.search_events(&predicate, &page).await.unwrap();

        assert_eq!(result.total_elements, 5);
        assert_eq!(result.total_pages, 3);
        let names: Vec<_> = result.items.iter().map(|r| r.event.name.as_str()).collect();
        assert_eq!(names, ["day 3", "day 4"]);
        assert_eq!(result.items[0].venue.city, "Austin");
        assert_eq!(result.items[0].creator_name, "Admin");
    }

    #[tokio::test]
    async fn search_sorts_descending_by_price() {
        let (store, venue_id, admin_id) = seeded().await;
        for price in [30, 10, 20] {
            store
                .insert_event(new_event(&format!("p{price}"), venue_id, admin_id, 1, price))
                .await
                .unwrap();
        }

        let page = PageRequest {
            sort: Sort {
                key: SortKey::Price,
                direction: SortDirection::Desc,
            },
            ..Default::default()
        };
        let result = store
            .search_events(&EventFilter::default().to_predicate(), &page)
            .await
            .unwrap();
        let prices: Vec<_> = result.items.iter().map(|r| r.event.price).collect();
        assert_eq!(
            prices,
            [Decimal::new(30, 0), Decimal::new(20, 0), Decimal::new(10, 0)]
        );
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (store, _, _) = seeded().await;
        let err = store
            .insert_user(NewUser {
                email: "admin@example.com".into(),
                password_hash: "other".into(),
                role: Role::User,
                name: "Copy".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(store.email_exists("admin@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn counts_events_per_venue() {
        let (store, venue_id, admin_id) = seeded().await;
        store
            .insert_event(new_event("one", venue_id, admin_id, 1, 10))
            .await
            .unwrap();
        assert_eq!(store.count_events_for_venue(venue_id).await.unwrap(), 1);
        assert_eq!(store.count_events_for_venue(Uuid::new_v4()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stale_update_cannot_revert_a_published_event() {
        let (store, venue_id, admin_id) = seeded().await;
        let mut draft = new_event("draft", venue_id, admin_id, 3, 10);
        draft.status = EventStatus::Draft;
        let event = store.insert_event(draft).await.unwrap();

        let mut published = event.clone();
        published.status = EventStatus::Published;
        store.update_event(&published).await.unwrap();

        let mut stale = event;
        stale.name = "renamed".into();
        let err = store.update_event(&stale).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = store.find_event(stale.id).await.unwrap().unwrap();
        assert_eq!(stored.event.status, EventStatus::Published);
        assert_eq!(stored.event.name, "draft");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn page_and_total_come_from_one_snapshot() {
        let (store, venue_id, admin_id) = seeded().await;
        let store = std::sync::Arc::new(store);

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    store
                        .insert_event(new_event(&format!("e{i}"), venue_id, admin_id, 1, 10))
                        .await
                        .unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        let predicate = EventFilter::default().to_predicate();
        let page = PageRequest {
            page: 0,
            size: 100,
            sort: Sort::default(),
        };
        for _ in 0..50 {
            let result = store.search_events(&predicate, &page).await.unwrap();
            assert_eq!(result.items.len() as u64, result.total_elements);
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();
    }
}
