//! The `LedgerStore` trait: the storage seam between the ledger service and
//! its backends.
//!
//! Two implementations ship with the workspace: [`crate::MemoryStore`]
//! (development and tests) and [`crate::PgStore`] (production). The trait
//! methods are deliberately coarse: each one is a single atomic step, so a
//! correct ledger can be built on top of them without cross-backend
//! transactions. In particular:
//!
//! - `debit_balance` only debits when the balance covers the amount,
//! - `transition_lock` is compare-and-swap on the current state,
//! - `find_or_create_account` is race-safe (concurrent calls for the same
//!   contact converge on one row).

use async_trait::async_trait;
use serde::Serialize;

use lockpay_core::types::{Amount, DbId};
use lockpay_core::LockState;

use crate::models::account::Account;
use crate::models::audit::{AuditRecord, CreateAuditRecord};
use crate::models::lock::{CreateLock, Lock};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Constraint name for the one-active-lock-per-claim-key rule. Shared so the
/// service layer can recognize the violation regardless of backend.
pub const UQ_ACTIVE_CLAIM_KEY: &str = "uq_locks_active_claim_key";

/// Default page size for audit history listing.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Maximum page size for audit history listing.
pub const MAX_HISTORY_LIMIT: i64 = 200;

/// Clamp a requested history page size to `1..=MAX_HISTORY_LIMIT`.
pub fn clamp_history_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures surfaced by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A `uq_`-named unique constraint was violated (e.g. a concurrent
    /// writer created the same active claim key first).
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A stored row failed to decode into its domain type.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// An underlying database error.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Ledger-wide sums used for the conservation check and the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    /// Sum of all account balances, in cents.
    pub sum_balances: Amount,
    /// Sum of all `active` lock amounts, in cents.
    pub sum_active_locks: Amount,
}

impl LedgerTotals {
    /// Total value in the system. Changes only when deposits inject money;
    /// lock, redeem, and refund merely move it.
    pub fn total(&self) -> Amount {
        self.sum_balances + self.sum_active_locks
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Return the account for `contact_key`, creating it with zero balance
    /// if it does not exist. Concurrent calls for the same contact converge
    /// on a single row.
    async fn find_or_create_account(&self, contact_key: &str) -> Result<Account, StoreError>;

    async fn get_account(&self, id: DbId) -> Result<Option<Account>, StoreError>;

    async fn get_account_by_contact(&self, contact_key: &str)
        -> Result<Option<Account>, StoreError>;

    /// Add `amount` to the balance. Returns the updated account, or `None`
    /// when no such account exists.
    async fn credit_balance(&self, id: DbId, amount: Amount) -> Result<Option<Account>, StoreError>;

    /// Subtract `amount` from the balance only if the balance covers it.
    /// Returns the updated account, or `None` when the account is missing
    /// or the balance is insufficient (callers check existence separately).
    async fn debit_balance(&self, id: DbId, amount: Amount) -> Result<Option<Account>, StoreError>;

    /// Insert a new lock in the `Active` state.
    ///
    /// Fails with [`StoreError::UniqueViolation`] (constraint
    /// [`UQ_ACTIVE_CLAIM_KEY`]) if an active lock already holds the same
    /// claim key.
    async fn create_lock(&self, input: &CreateLock) -> Result<Lock, StoreError>;

    async fn get_lock(&self, id: DbId) -> Result<Option<Lock>, StoreError>;

    async fn get_active_lock_by_claim_key(&self, claim_key: &str)
        -> Result<Option<Lock>, StoreError>;

    /// Compare-and-swap the lock state: applies `from -> to` only if the
    /// lock is currently in `from`. Returns the updated lock, or `None`
    /// when the lock is missing or not in `from`.
    async fn transition_lock(
        &self,
        id: DbId,
        from: LockState,
        to: LockState,
    ) -> Result<Option<Lock>, StoreError>;

    async fn append_audit(&self, input: &CreateAuditRecord) -> Result<AuditRecord, StoreError>;

    /// Audit records where `contact_key` is the acting or counterparty
    /// side, newest first.
    async fn list_audit_for_contact(
        &self,
        contact_key: &str,
        limit: Option<i64>,
    ) -> Result<Vec<AuditRecord>, StoreError>;

    async fn totals(&self) -> Result<LedgerTotals, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
