//! Repository for the `accounts` table.

use sqlx::PgPool;

use lockpay_core::types::{Amount, DbId};

use crate::models::account::Account;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, contact_key, balance, created_at, updated_at";

/// Provides operations for ledger accounts.
pub struct AccountRepo;

impl AccountRepo {
    /// Find the account for a contact, creating it with zero balance if
    /// missing. The no-op `DO UPDATE` makes the upsert return the existing
    /// row instead of nothing, so concurrent callers all get the same row.
    pub async fn find_or_create(pool: &PgPool, contact_key: &str) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts (contact_key)
             VALUES ($1)
             ON CONFLICT (contact_key)
             DO UPDATE SET contact_key = EXCLUDED.contact_key
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(contact_key)
            .fetch_one(pool)
            .await
    }

    /// Find an account by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by contact number.
    pub async fn find_by_contact(
        pool: &PgPool,
        contact_key: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE contact_key = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(contact_key)
            .fetch_optional(pool)
            .await
    }

    /// Add `amount` to the balance. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn credit(
        pool: &PgPool,
        id: DbId,
        amount: Amount,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "UPDATE accounts
             SET balance = balance + $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(amount)
            .fetch_optional(pool)
            .await
    }

    /// Subtract `amount` from the balance only if the balance covers it.
    ///
    /// The `balance >= $2` guard makes the debit atomic: two concurrent
    /// debits can never take the balance negative. Returns `None` when the
    /// row is missing or the guard fails.
    pub async fn debit_if_sufficient(
        pool: &PgPool,
        id: DbId,
        amount: Amount,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "UPDATE accounts
             SET balance = balance - $2, updated_at = NOW()
             WHERE id = $1 AND balance >= $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(amount)
            .fetch_optional(pool)
            .await
    }

    /// Sum of all account balances in cents.
    pub async fn sum_balances(pool: &PgPool) -> Result<Amount, sqlx::Error> {
        // SUM(BIGINT) is NUMERIC in Postgres; cast back for the i64 decode.
        let row: (Amount,) =
            sqlx::query_as("SELECT COALESCE(SUM(balance), 0)::BIGINT FROM accounts")
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
