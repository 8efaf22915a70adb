// src/config/db.rs
// DOCUMENTATION: Store initialization
// PURPOSE: Pick the JournalStore named by DATABASE_URL and prepare it

use crate::config::Config;
use crate::db::{MemoryStore, PgStore, Store};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;

/// Build the store for this process
/// DOCUMENTATION: "memory://" selects MemoryStore; anything else is a
/// PostgreSQL URL whose schema is migrated before the first request
pub async fn init_store(config: &Config) -> Result<Store, sqlx::Error> {
    if config.uses_memory_store() {
        log::warn!("Using the in-memory store; data is lost on shutdown");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = init_db_pool(config).await?;
    Ok(Arc::new(PgStore::new(pool)))
}

async fn init_db_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!(
        "Connecting to PostgreSQL (max {} connections)",
        config.db_max_connections
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        // Idle connections are closed after 5 minutes, all are recycled after 30
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    let migrator = sqlx::migrate!("./migrations");
    migrator.run(&pool).await?;
    log::info!("Schema up to date ({} migrations)", migrator.iter().count());

    Ok(pool)
}
