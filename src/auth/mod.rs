pub mod extract;
pub mod jwt;
pub mod password;

pub use extract::{AdminUser, CurrentUser};
pub use jwt::{Claims, TokenService};
