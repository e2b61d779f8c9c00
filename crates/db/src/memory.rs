//! In-memory ledger store.
//!
//! Backs development mode and the test suites; no external services. Every
//! trait operation takes the single `RwLock` once, so each is atomic exactly
//! like its Postgres counterpart (one conditional UPDATE, one upsert). Data
//! lives only as long as the process.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use async_trait::async_trait;
use lockpay_core::types::{Amount, DbId};
use lockpay_core::LockState;

use crate::models::account::Account;
use crate::models::audit::{AuditRecord, CreateAuditRecord};
use crate::models::lock::{CreateLock, Lock};
use crate::store::{
    clamp_history_limit, LedgerStore, LedgerTotals, StoreError, UQ_ACTIVE_CLAIM_KEY,
};

#[derive(Default)]
struct Inner {
    accounts: HashMap<DbId, Account>,
    accounts_by_contact: HashMap<String, DbId>,
    locks: HashMap<DbId, Lock>,
    /// claim_key -> lock id, for locks currently in the `Active` state.
    /// Mirrors the `uq_locks_active_claim_key` partial unique index.
    active_claims: HashMap<String, DbId>,
    audit: Vec<AuditRecord>,
    next_account_id: DbId,
    next_lock_id: DbId,
    next_audit_id: DbId,
}

impl Inner {
    fn next_account_id(&mut self) -> DbId {
        self.next_account_id += 1;
        self.next_account_id
    }

    fn next_lock_id(&mut self) -> DbId {
        self.next_lock_id += 1;
        self.next_lock_id
    }

    fn next_audit_id(&mut self) -> DbId {
        self.next_audit_id += 1;
        self.next_audit_id
    }
}

/// In-memory [`LedgerStore`] implementation.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn find_or_create_account(&self, contact_key: &str) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(id) = inner.accounts_by_contact.get(contact_key) {
            let id = *id;
            return Ok(inner.accounts[&id].clone());
        }
        let now = Utc::now();
        let id = inner.next_account_id();
        let account = Account {
            id,
            contact_key: contact_key.to_string(),
            balance: 0,
            created_at: now,
            updated_at: now,
        };
        inner.accounts.insert(id, account.clone());
        inner.accounts_by_contact.insert(contact_key.to_string(), id);
        Ok(account)
    }

    async fn get_account(&self, id: DbId) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.get(&id).cloned())
    }

    async fn get_account_by_contact(
        &self,
        contact_key: &str,
    ) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts_by_contact
            .get(contact_key)
            .and_then(|id| inner.accounts.get(id))
            .cloned())
    }

    async fn credit_balance(&self, id: DbId, amount: Amount) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(account) = inner.accounts.get_mut(&id) else {
            return Ok(None);
        };
        account.balance += amount;
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn debit_balance(&self, id: DbId, amount: Amount) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(account) = inner.accounts.get_mut(&id) else {
            return Ok(None);
        };
        if account.balance < amount {
            return Ok(None);
        }
        account.balance -= amount;
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn create_lock(&self, input: &CreateLock) -> Result<Lock, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.active_claims.contains_key(&input.claim_key) {
            return Err(StoreError::UniqueViolation {
                constraint: UQ_ACTIVE_CLAIM_KEY.to_string(),
            });
        }
        let id = inner.next_lock_id();
        let lock = Lock {
            id,
            reference: input.reference.clone(),
            amount: input.amount,
            sender_account_id: input.sender_account_id,
            claim_key: input.claim_key.clone(),
            state: LockState::Active,
            created_at: input.created_at,
            expires_at: input.expires_at,
        };
        inner.locks.insert(id, lock.clone());
        inner.active_claims.insert(input.claim_key.clone(), id);
        Ok(lock)
    }

    async fn get_lock(&self, id: DbId) -> Result<Option<Lock>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.locks.get(&id).cloned())
    }

    async fn get_active_lock_by_claim_key(
        &self,
        claim_key: &str,
    ) -> Result<Option<Lock>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .active_claims
            .get(claim_key)
            .and_then(|id| inner.locks.get(id))
            .cloned())
    }

    async fn transition_lock(
        &self,
        id: DbId,
        from: LockState,
        to: LockState,
    ) -> Result<Option<Lock>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(lock) = inner.locks.get_mut(&id) else {
            return Ok(None);
        };
        if lock.state != from {
            return Ok(None);
        }
        lock.state = to;
        let updated = lock.clone();
        if from == LockState::Active {
            inner.active_claims.remove(&updated.claim_key);
        }
        Ok(Some(updated))
    }

    async fn append_audit(&self, input: &CreateAuditRecord) -> Result<AuditRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_audit_id();
        let record = AuditRecord {
            id,
            kind: input.kind,
            amount: input.amount,
            contact_key: input.contact_key.clone(),
            counterparty_contact: input.counterparty_contact.clone(),
            lock_id: input.lock_id,
            lock_reference: input.lock_reference.clone(),
            description: input.description.clone(),
            created_at: input.created_at,
        };
        inner.audit.push(record.clone());
        Ok(record)
    }

    async fn list_audit_for_contact(
        &self,
        contact_key: &str,
        limit: Option<i64>,
    ) -> Result<Vec<AuditRecord>, StoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<AuditRecord> = inner
            .audit
            .iter()
            .filter(|r| {
                r.contact_key == contact_key
                    || r.counterparty_contact.as_deref() == Some(contact_key)
            })
            .cloned()
            .collect();
        // Newest first; id breaks ties between same-instant records.
        records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        records.truncate(clamp_history_limit(limit) as usize);
        Ok(records)
    }

    async fn totals(&self) -> Result<LedgerTotals, StoreError> {
        let inner = self.inner.read().await;
        let sum_balances = inner.accounts.values().map(|a| a.balance).sum();
        let sum_active_locks = inner
            .locks
            .values()
            .filter(|l| l.state == LockState::Active)
            .map(|l| l.amount)
            .sum();
        Ok(LedgerTotals {
            sum_balances,
            sum_active_locks,
        })
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
