pub mod events;
pub mod users;
pub mod venues;

pub use events::EventService;
pub use users::UserService;
pub use venues::VenueService;
