//! Data models
//!
//! Shared between the food server and its HTTP clients.
//! Wire format is camelCase, matching the ordering client.
//! All IDs are `i64` (Postgres BIGSERIAL), timestamps are Unix millis.

pub mod category;
pub mod menu;
pub mod order;
pub mod user;

// Re-exports
pub use category::*;
pub use menu::*;
pub use order::*;
pub use user::*;
