//! Authentication and role checks

pub mod extractor;
pub mod jwt;
pub mod role;

pub use jwt::{Claims, JwtError, JwtService};
pub use role::{CurrentUser, require_author, require_role};
