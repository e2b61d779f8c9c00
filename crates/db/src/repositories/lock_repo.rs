//! Repository for the `locks` table.

use sqlx::PgPool;

use lockpay_core::types::{Amount, DbId};
use lockpay_core::LockState;

use crate::models::lock::{CreateLock, LockRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, reference, amount, sender_account_id, claim_key, state, created_at, expires_at";

/// Provides operations for payment locks.
pub struct LockRepo;

impl LockRepo {
    /// Insert a new lock in the `active` state, returning the created row.
    ///
    /// The partial unique index `uq_locks_active_claim_key` rejects a second
    /// active lock with the same claim key at the database level.
    pub async fn create(pool: &PgPool, input: &CreateLock) -> Result<LockRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO locks (reference, amount, sender_account_id, claim_key, state, created_at, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LockRow>(&query)
            .bind(&input.reference)
            .bind(input.amount)
            .bind(input.sender_account_id)
            .bind(&input.claim_key)
            .bind(LockState::Active.as_str())
            .bind(input.created_at)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a lock by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LockRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locks WHERE id = $1");
        sqlx::query_as::<_, LockRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the active lock for a claim key, if any. At most one exists.
    pub async fn find_active_by_claim_key(
        pool: &PgPool,
        claim_key: &str,
    ) -> Result<Option<LockRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locks WHERE claim_key = $1 AND state = $2");
        sqlx::query_as::<_, LockRow>(&query)
            .bind(claim_key)
            .bind(LockState::Active.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Atomically transition a lock from one state to another.
    ///
    /// The `state = $2` guard makes this compare-and-swap: of two racing
    /// transitions out of the same state, exactly one sees the row. Returns
    /// `None` when the lock is missing or not in `from`.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: LockState,
        to: LockState,
    ) -> Result<Option<LockRow>, sqlx::Error> {
        let query = format!(
            "UPDATE locks
             SET state = $3
             WHERE id = $1 AND state = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LockRow>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Sum of all active lock amounts in cents.
    pub async fn sum_active_amounts(pool: &PgPool) -> Result<Amount, sqlx::Error> {
        // SUM(BIGINT) is NUMERIC in Postgres; cast back for the i64 decode.
        let row: (Amount,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM locks WHERE state = $1",
        )
        .bind(LockState::Active.as_str())
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
