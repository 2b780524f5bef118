//! merch-migrate: one-shot legacy catalog migration
//!
//! Reads `DATABASE_URL`, applies schema migrations, then moves the legacy
//! product/merchant tables into the catalog and listing model. Entity
//! failures land in the printed report; only a connection failure exits
//! non-zero.

use std::sync::Arc;

use merch_cloud::AppState;
use merch_cloud::db::PgRepository;
use merch_cloud::migration::{self, PgLegacySource};
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "merch_cloud=info".into()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let pool = PgPool::connect(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("PostgreSQL ready, migrations applied");

    // Tokens are never issued here
    let state = AppState::with_repository(Arc::new(PgRepository::new(pool.clone())), "");
    let legacy = PgLegacySource::new(pool);

    let report = migration::run(&state, &legacy).await;
    if !report.failures.is_empty() {
        tracing::warn!(
            failures = report.failures.len(),
            "Migration finished with entity failures"
        );
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
