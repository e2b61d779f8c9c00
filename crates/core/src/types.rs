//! Shared type aliases used across the workspace.

/// Database row identifier (BIGSERIAL in Postgres, counter in memory).
pub type DbId = i64;

/// Monetary amount in minor units (cents) of the ledger currency.
pub type Amount = i64;

/// UTC timestamp used for all ledger times.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
