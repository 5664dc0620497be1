pub mod error;
pub mod extract;
pub mod params;
pub mod response;
pub mod validation;
