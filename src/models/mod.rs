pub mod event;
pub mod page;
pub mod user;
pub mod venue;

pub use event::{
    CreateEventRequest, Event, EventCategory, EventRecord, EventResponse, EventStatus,
    EventSummary, NewEvent, UpdateEventRequest,
};
pub use page::{Page, PageRequest, Sort, SortDirection, SortKey};
pub use user::{LoginRequest, LoginResponse, NewUser, RegisterRequest, Role, User, UserResponse};
pub use venue::{CreateVenueRequest, NewVenue, UpdateVenueRequest, Venue, VenueSummary};
