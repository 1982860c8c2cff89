//! food-server: menu catalog, inventory and order workflow over HTTP

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod inventory;
pub mod orders;
pub mod state;
pub mod util;

pub use config::Config;
pub use state::AppState;
