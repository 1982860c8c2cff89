//! Application state for the food server

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::JwtService;
use crate::config::Config;
use crate::db::Store;
use crate::db::memory::MemoryStore;
use crate::db::pg::PgStore;
use crate::orders::OrderWorkflow;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (PostgreSQL or in-memory)
    pub store: Arc<dyn Store>,
    /// Token issuing and validation
    pub jwt: JwtService,
}

impl AppState {
    /// Create a new AppState, connecting and migrating the database when configured
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let pool = PgPool::connect(url).await?;
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Database migrations applied");
                Arc::new(PgStore::new(pool))
            }
            None => {
                tracing::warn!(
                    "DATABASE_URL not set, using in-memory store (data is not persisted)"
                );
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(store, JwtService::from_config(config)))
    }

    /// Build state around an existing store
    pub fn with_store(store: Arc<dyn Store>, jwt: JwtService) -> Self {
        Self { store, jwt }
    }

    pub fn orders(&self) -> OrderWorkflow<'_> {
        OrderWorkflow::new(self.store.as_ref())
    }
}
