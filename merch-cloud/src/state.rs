//! Application state for merch-cloud

use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::Synchronizer;
use crate::config::{Config, StorageBackend};
use crate::db::{MemoryRepository, PgRepository, Repository};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persistence seam (Postgres or in-memory)
    pub repo: Arc<dyn Repository>,
    /// Per-listing serialized `variants_summary` writer
    pub sync: Arc<Synchronizer>,
    /// JWT secret for bearer authentication
    pub jwt_secret: String,
}

impl AppState {
    /// Create a new AppState from configuration
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let repo: Arc<dyn Repository> = match config.storage {
            StorageBackend::Postgres => {
                let pool = PgPool::connect(&config.database_url).await?;
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("PostgreSQL ready, migrations applied");
                Arc::new(PgRepository::new(pool))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Arc::new(MemoryRepository::new())
            }
        };
        Ok(Self::with_repository(repo, config.jwt_secret.clone()))
    }

    /// Build state around an existing repository
    pub fn with_repository(repo: Arc<dyn Repository>, jwt_secret: impl Into<String>) -> Self {
        Self {
            sync: Arc::new(Synchronizer::new(repo.clone())),
            repo,
            jwt_secret: jwt_secret.into(),
        }
    }
}
