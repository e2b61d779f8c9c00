//! Storage layer for the LockPay ledger.
//!
//! Defines the [`LedgerStore`] trait plus two backends: [`MemoryStore`]
//! (development and tests) and [`PgStore`] (production, sqlx/Postgres with
//! embedded migrations). Pool and migration helpers live at the crate root
//! so the API binary can bootstrap with three calls: [`create_pool`],
//! [`health_check`], [`run_migrations`].

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{LedgerStore, LedgerTotals, StoreError};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable with a trivial round-trip query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from the embedded `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
