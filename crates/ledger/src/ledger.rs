//! The lock payment ledger service.
//!
//! [`LockLedger`] composes a storage backend, a [`Clock`], and the
//! per-claim-key mutex registry into the product's money operations:
//! authenticate, deposit, lock, redeem, refund, plus the read-side probes.
//!
//! Two invariants are enforced here and nowhere else:
//!
//! - Conservation: every balance debit pairs with a lock row and every
//!   credit with a claimed or refunded lock, so the sum of balances plus
//!   active lock amounts never changes across lock, redeem, and refund.
//! - At most one claim per lock: state moves through compare-and-set
//!   transitions taken under the claim-key mutex, so concurrent redeems
//!   of the same lock resolve to exactly one winner.
//!
//! Expiry is lazy. No background job sweeps locks; the first access past
//! `expires_at` parks the lock in the expired state, after which only a
//! refund can move it.

use std::sync::Arc;

use chrono::Duration;

use lockpay_core::audit::{self, AuditKind};
use lockpay_core::lock_state::{validate_transition, LockState};
use lockpay_core::types::{Amount, DbId};
use lockpay_core::{reference, validation, ClaimKey, LedgerError};
use lockpay_db::models::account::Account;
use lockpay_db::models::audit::{AuditRecord, CreateAuditRecord};
use lockpay_db::models::lock::{CreateLock, Lock};
use lockpay_db::store::UQ_ACTIVE_CLAIM_KEY;
use lockpay_db::{LedgerStore, LedgerTotals, StoreError};

use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::keys::ClaimKeyLocks;

/// Outcome of a successful redemption.
#[derive(Debug, Clone)]
pub struct Redemption {
    /// The lock, now claimed.
    pub lock: Lock,
    /// The destination account after the credit landed.
    pub destination: Account,
}

/// The ledger service. Cheap to share behind an [`Arc`]; all operations
/// take `&self`.
pub struct LockLedger {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    config: LedgerConfig,
    claim_locks: ClaimKeyLocks,
}

impl LockLedger {
    /// Ledger over `store` with the system clock and default policy.
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        LockLedger::with_parts(store, Arc::new(SystemClock), LedgerConfig::default())
    }

    /// Ledger with an explicit clock and policy. Tests pass a
    /// [`crate::clock::ManualClock`] here to drive expiry.
    pub fn with_parts(
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        config: LedgerConfig,
    ) -> Self {
        LockLedger {
            store,
            clock,
            config,
            claim_locks: ClaimKeyLocks::new(),
        }
    }

    /// Resolve a contact number to its account, creating the account with a
    /// zero balance on first sight. Idempotent: the same contact always maps
    /// to the same account.
    pub async fn authenticate(&self, contact: &str) -> Result<Account, LedgerError> {
        let contact = validation::normalize_contact(contact, self.config.min_contact_digits)?;
        let account = self
            .store
            .find_or_create_account(&contact)
            .await
            .map_err(storage)?;
        tracing::info!(account_id = account.id, "account authenticated");
        Ok(account)
    }

    /// Fetch an account by id.
    pub async fn account(&self, account_id: DbId) -> Result<Account, LedgerError> {
        self.store
            .get_account(account_id)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::NotFound { entity: "account" })
    }

    /// Credit an account balance and record the deposit.
    pub async fn deposit(&self, account_id: DbId, amount: Amount) -> Result<Account, LedgerError> {
        validation::validate_deposit_amount(amount, self.config.max_deposit)?;

        let account = self
            .store
            .credit_balance(account_id, amount)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::NotFound { entity: "account" })?;

        self.record(CreateAuditRecord {
            kind: AuditKind::Deposit,
            amount,
            contact_key: account.contact_key.clone(),
            counterparty_contact: None,
            lock_id: None,
            lock_reference: None,
            description: audit::deposit_description(amount),
            created_at: self.clock.now(),
        })
        .await?;

        tracing::info!(account_id, amount, "deposit applied");
        Ok(account)
    }

    /// Move funds out of the sender's balance into a new one-time lock
    /// claimable with the recipient contact + PIN pair.
    ///
    /// Only one active lock may exist per claim key; a second lock for the
    /// same contact + PIN pair is rejected with [`LedgerError::DuplicateLock`]
    /// until the first one is claimed or refunded.
    pub async fn lock(
        &self,
        sender_account_id: DbId,
        amount: Amount,
        recipient_contact: &str,
        pin: &str,
        duration_secs: Option<i64>,
    ) -> Result<Lock, LedgerError> {
        validation::validate_amount(amount)?;
        let recipient =
            validation::normalize_contact(recipient_contact, self.config.min_contact_digits)?;
        validation::validate_pin(pin, self.config.min_pin_digits)?;
        let duration_secs = duration_secs.unwrap_or(self.config.default_lock_duration_secs);
        validation::validate_lock_duration(duration_secs, self.config.max_lock_duration_secs)?;

        let sender = self
            .store
            .get_account(sender_account_id)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::NotFound { entity: "account" })?;
        if sender.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: sender.balance,
            });
        }

        let claim_key = ClaimKey::derive(&recipient, pin);
        let _guard = self.claim_locks.acquire(claim_key.as_str()).await;

        if self
            .store
            .get_active_lock_by_claim_key(claim_key.as_str())
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(LedgerError::DuplicateLock);
        }

        // The conditional debit re-checks the balance, so a concurrent spend
        // between the read above and this point cannot overdraw.
        let debited = self
            .store
            .debit_balance(sender.id, amount)
            .await
            .map_err(storage)?;
        let Some(sender) = debited else {
            let available = self
                .store
                .get_account(sender_account_id)
                .await
                .map_err(storage)?
                .map(|account| account.balance)
                .unwrap_or(0);
            return Err(LedgerError::InsufficientBalance { available });
        };

        let now = self.clock.now();
        let input = CreateLock {
            reference: reference::generate_reference(),
            amount,
            sender_account_id: sender.id,
            claim_key: claim_key.into_string(),
            created_at: now,
            expires_at: now + Duration::seconds(duration_secs),
        };
        let lock = match self.store.create_lock(&input).await {
            Ok(lock) => lock,
            Err(err) => {
                // The debit already landed; put the funds back before
                // reporting, otherwise they would be stranded.
                self.store
                    .credit_balance(sender.id, amount)
                    .await
                    .map_err(storage)?;
                return Err(duplicate_or_storage(err));
            }
        };

        self.record(CreateAuditRecord {
            kind: AuditKind::Lock,
            amount,
            contact_key: sender.contact_key.clone(),
            counterparty_contact: Some(recipient.clone()),
            lock_id: Some(lock.id),
            lock_reference: Some(lock.reference.clone()),
            description: audit::lock_description(amount, &recipient),
            created_at: now,
        })
        .await?;

        tracing::info!(
            lock_id = lock.id,
            reference = %lock.reference,
            sender_account_id = sender.id,
            amount,
            "lock created"
        );
        Ok(lock)
    }

    /// Claim an active lock with its contact + PIN pair and credit the funds
    /// to the destination contact's account, creating it if needed.
    ///
    /// Wrong contact, wrong PIN, and already-consumed locks are deliberately
    /// indistinguishable in the error; the response must not reveal which
    /// part of the pair was off.
    pub async fn redeem(
        &self,
        recipient_contact: &str,
        pin: &str,
        destination_contact: &str,
    ) -> Result<Redemption, LedgerError> {
        let recipient =
            validation::normalize_contact(recipient_contact, self.config.min_contact_digits)?;
        validation::validate_pin(pin, self.config.min_pin_digits)?;
        let destination =
            validation::normalize_contact(destination_contact, self.config.min_contact_digits)?;

        let claim_key = ClaimKey::derive(&recipient, pin);
        let _guard = self.claim_locks.acquire(claim_key.as_str()).await;

        let lock = self
            .store
            .get_active_lock_by_claim_key(claim_key.as_str())
            .await
            .map_err(storage)?
            .ok_or_else(LedgerError::claim_not_found)?;

        let now = self.clock.now();
        if now >= lock.expires_at {
            // First access past the deadline parks the lock as expired so the
            // sender can refund it.
            self.store
                .transition_lock(lock.id, LockState::Active, LockState::Expired)
                .await
                .map_err(storage)?;
            return Err(LedgerError::Expired {
                expired_at: lock.expires_at,
            });
        }

        // Compare-and-set: of all concurrent redeems for this lock, exactly
        // one observes active -> claimed succeed.
        let claimed = self
            .store
            .transition_lock(lock.id, LockState::Active, LockState::Claimed)
            .await
            .map_err(storage)?
            .ok_or_else(LedgerError::claim_not_found)?;

        let destination_account = self
            .store
            .find_or_create_account(&destination)
            .await
            .map_err(storage)?;
        let destination_account = self
            .store
            .credit_balance(destination_account.id, claimed.amount)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::NotFound { entity: "account" })?;

        self.record(CreateAuditRecord {
            kind: AuditKind::Redeem,
            amount: claimed.amount,
            contact_key: recipient.clone(),
            counterparty_contact: (destination != recipient).then(|| destination.clone()),
            lock_id: Some(claimed.id),
            lock_reference: Some(claimed.reference.clone()),
            description: audit::redeem_description(claimed.amount),
            created_at: now,
        })
        .await?;

        tracing::info!(
            lock_id = claimed.id,
            reference = %claimed.reference,
            amount = claimed.amount,
            "lock redeemed"
        );
        Ok(Redemption {
            lock: claimed,
            destination: destination_account,
        })
    }

    /// Return the funds of an expired lock to the sender.
    ///
    /// Allowed only from the expired state. An active lock whose deadline has
    /// passed is expired on the way through; an active lock still inside its
    /// window, or one already claimed or refunded, is rejected with
    /// [`LedgerError::InvalidState`].
    pub async fn refund_expired(&self, lock_id: DbId) -> Result<Account, LedgerError> {
        let lock = self
            .store
            .get_lock(lock_id)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::NotFound { entity: "lock" })?;

        let _guard = self.claim_locks.acquire(&lock.claim_key).await;

        // Re-read under the guard; a redeem may have raced the first read.
        let lock = self
            .store
            .get_lock(lock_id)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::NotFound { entity: "lock" })?;

        let now = self.clock.now();
        match lock.state {
            LockState::Active if now >= lock.expires_at => {
                self.store
                    .transition_lock(lock.id, LockState::Active, LockState::Expired)
                    .await
                    .map_err(storage)?;
            }
            state => validate_transition(state, LockState::Refunded)?,
        }

        let refunded = match self
            .store
            .transition_lock(lock.id, LockState::Expired, LockState::Refunded)
            .await
            .map_err(storage)?
        {
            Some(lock) => lock,
            None => {
                // Lost a cross-process race; report the state that won.
                let current = self
                    .store
                    .get_lock(lock_id)
                    .await
                    .map_err(storage)?
                    .ok_or(LedgerError::NotFound { entity: "lock" })?;
                return Err(LedgerError::InvalidState {
                    from: current.state,
                    to: LockState::Refunded,
                });
            }
        };

        let sender = self
            .store
            .credit_balance(refunded.sender_account_id, refunded.amount)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::NotFound { entity: "account" })?;

        self.record(CreateAuditRecord {
            kind: AuditKind::Refund,
            amount: refunded.amount,
            contact_key: sender.contact_key.clone(),
            counterparty_contact: None,
            lock_id: Some(refunded.id),
            lock_reference: Some(refunded.reference.clone()),
            description: audit::refund_description(refunded.amount),
            created_at: now,
        })
        .await?;

        tracing::info!(
            lock_id = refunded.id,
            amount = refunded.amount,
            "expired lock refunded"
        );
        Ok(sender)
    }

    /// Look up an active lock by its contact + PIN pair without changing
    /// anything. Reports [`LedgerError::Expired`] for a lock past its
    /// deadline, but leaves the state transition to redeem or refund.
    pub async fn probe_lock(
        &self,
        recipient_contact: &str,
        pin: &str,
    ) -> Result<Lock, LedgerError> {
        let recipient =
            validation::normalize_contact(recipient_contact, self.config.min_contact_digits)?;
        validation::validate_pin(pin, self.config.min_pin_digits)?;
        let claim_key = ClaimKey::derive(&recipient, pin);

        let lock = self
            .store
            .get_active_lock_by_claim_key(claim_key.as_str())
            .await
            .map_err(storage)?
            .ok_or_else(LedgerError::claim_not_found)?;

        if self.clock.now() >= lock.expires_at {
            return Err(LedgerError::Expired {
                expired_at: lock.expires_at,
            });
        }
        Ok(lock)
    }

    /// Transaction history for a contact, newest first. Matches records where
    /// the contact acted or was the lock recipient.
    pub async fn history(
        &self,
        contact_key: &str,
        limit: Option<i64>,
    ) -> Result<Vec<AuditRecord>, LedgerError> {
        self.store
            .list_audit_for_contact(contact_key, limit)
            .await
            .map_err(storage)
    }

    /// Ledger-wide sums used by the stats endpoint and the conservation
    /// checks in tests.
    pub async fn totals(&self) -> Result<LedgerTotals, LedgerError> {
        self.store.totals().await.map_err(storage)
    }

    /// Storage reachability probe for the health endpoint.
    pub async fn health(&self) -> Result<(), LedgerError> {
        self.store.health_check().await.map_err(storage)
    }

    async fn record(&self, entry: CreateAuditRecord) -> Result<(), LedgerError> {
        self.store.append_audit(&entry).await.map_err(storage)?;
        Ok(())
    }
}

fn storage(err: StoreError) -> LedgerError {
    LedgerError::Storage(err.to_string())
}

/// A unique violation on the active-claim-key index means another writer
/// locked the same contact + PIN pair first; anything else is a storage
/// fault.
fn duplicate_or_storage(err: StoreError) -> LedgerError {
    match err {
        StoreError::UniqueViolation { constraint } if constraint == UQ_ACTIVE_CLAIM_KEY => {
            LedgerError::DuplicateLock
        }
        other => storage(other),
    }
}
