//! Postgres-backed ledger store.
//!
//! Thin adapter from the [`LedgerStore`] trait onto the repository layer:
//! delegates each operation to a repository method, remaps unique-constraint
//! violations, and decodes raw rows into domain types.

use async_trait::async_trait;
use sqlx::PgPool;

use lockpay_core::types::{Amount, DbId};
use lockpay_core::LockState;

use crate::models::account::Account;
use crate::models::audit::{AuditRecord, CreateAuditRecord};
use crate::models::lock::{CreateLock, Lock};
use crate::repositories::{AccountRepo, AuditRepo, LockRepo};
use crate::store::{LedgerStore, LedgerTotals, StoreError};

/// Postgres [`LedgerStore`] implementation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

/// Surface `uq_`-named unique violations as [`StoreError::UniqueViolation`]
/// so callers can react to them; everything else stays a database error.
fn remap(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505.
        if db_err.code().as_deref() == Some("23505") {
            if let Some(constraint) = db_err.constraint() {
                if constraint.starts_with("uq_") {
                    return StoreError::UniqueViolation {
                        constraint: constraint.to_string(),
                    };
                }
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl LedgerStore for PgStore {
    async fn find_or_create_account(&self, contact_key: &str) -> Result<Account, StoreError> {
        AccountRepo::find_or_create(&self.pool, contact_key)
            .await
            .map_err(remap)
    }

    async fn get_account(&self, id: DbId) -> Result<Option<Account>, StoreError> {
        Ok(AccountRepo::find_by_id(&self.pool, id).await?)
    }

    async fn get_account_by_contact(
        &self,
        contact_key: &str,
    ) -> Result<Option<Account>, StoreError> {
        Ok(AccountRepo::find_by_contact(&self.pool, contact_key).await?)
    }

    async fn credit_balance(&self, id: DbId, amount: Amount) -> Result<Option<Account>, StoreError> {
        Ok(AccountRepo::credit(&self.pool, id, amount).await?)
    }

    async fn debit_balance(&self, id: DbId, amount: Amount) -> Result<Option<Account>, StoreError> {
        Ok(AccountRepo::debit_if_sufficient(&self.pool, id, amount).await?)
    }

    async fn create_lock(&self, input: &CreateLock) -> Result<Lock, StoreError> {
        let row = LockRepo::create(&self.pool, input).await.map_err(remap)?;
        Lock::try_from(row).map_err(StoreError::Corrupt)
    }

    async fn get_lock(&self, id: DbId) -> Result<Option<Lock>, StoreError> {
        LockRepo::find_by_id(&self.pool, id)
            .await?
            .map(|row| Lock::try_from(row).map_err(StoreError::Corrupt))
            .transpose()
    }

    async fn get_active_lock_by_claim_key(
        &self,
        claim_key: &str,
    ) -> Result<Option<Lock>, StoreError> {
        LockRepo::find_active_by_claim_key(&self.pool, claim_key)
            .await?
            .map(|row| Lock::try_from(row).map_err(StoreError::Corrupt))
            .transpose()
    }

    async fn transition_lock(
        &self,
        id: DbId,
        from: LockState,
        to: LockState,
    ) -> Result<Option<Lock>, StoreError> {
        LockRepo::transition(&self.pool, id, from, to)
            .await?
            .map(|row| Lock::try_from(row).map_err(StoreError::Corrupt))
            .transpose()
    }

    async fn append_audit(&self, input: &CreateAuditRecord) -> Result<AuditRecord, StoreError> {
        let row = AuditRepo::append(&self.pool, input).await?;
        AuditRecord::try_from(row).map_err(StoreError::Corrupt)
    }

    async fn list_audit_for_contact(
        &self,
        contact_key: &str,
        limit: Option<i64>,
    ) -> Result<Vec<AuditRecord>, StoreError> {
        AuditRepo::list_for_contact(&self.pool, contact_key, limit)
            .await?
            .into_iter()
            .map(|row| AuditRecord::try_from(row).map_err(StoreError::Corrupt))
            .collect()
    }

    async fn totals(&self) -> Result<LedgerTotals, StoreError> {
        let sum_balances = AccountRepo::sum_balances(&self.pool).await?;
        let sum_active_locks = LockRepo::sum_active_amounts(&self.pool).await?;
        Ok(LedgerTotals {
            sum_balances,
            sum_active_locks,
        })
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
