//! Persistence ports and their adapters.
//!
//! Services only see the repository traits. [`postgres::PgStore`] backs the
//! running server; [`memory::MemoryStore`] keeps everything in process and is
//! what the test suites run against.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::filter::Predicate;
use crate::models::{
    Event, EventRecord, NewEvent, NewUser, NewVenue, Page, PageRequest, User, Venue,
};
use crate::utils::error::AppResult;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert_event(&self, event: NewEvent) -> AppResult<Event>;

    async fn find_event(&self, id: Uuid) -> AppResult<Option<EventRecord>>;

    /// Persists every mutable column of `event`, but only while the stored
    /// row is still a draft. A row that has left DRAFT is a `Conflict`.
    async fn update_event(&self, event: &Event) -> AppResult<()>;

    /// Returns `false` when no row matched.
    async fn delete_event(&self, id: Uuid) -> AppResult<bool>;

    /// One page of matches in the requested order plus the total match count.
    async fn search_events(
        &self,
        predicate: &Predicate,
        page: &PageRequest,
    ) -> AppResult<Page<EventRecord>>;

    async fn count_events_for_venue(&self, venue_id: Uuid) -> AppResult<u64>;
}

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn insert_venue(&self, venue: NewVenue) -> AppResult<Venue>;

    async fn find_venue(&self, id: Uuid) -> AppResult<Option<Venue>>;

    /// All venues ordered by name.
    async fn list_venues(&self) -> AppResult<Vec<Venue>>;

    async fn update_venue(&self, venue: &Venue) -> AppResult<()>;

    async fn delete_venue(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, user: NewUser) -> AppResult<User>;

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> AppResult<bool>;
}

/// Everything the services need from persistence.
pub trait Store: EventRepository + VenueRepository + UserRepository {}

impl<T> Store for T where T: EventRepository + VenueRepository + UserRepository {}
