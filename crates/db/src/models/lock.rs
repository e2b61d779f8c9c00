//! Lock entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use lockpay_core::types::{Amount, DbId, Timestamp};
use lockpay_core::LockState;

/// Raw lock row from the `locks` table, state still as stored text.
///
/// Contains the claim key -- NEVER serialize this to API responses directly.
/// Use [`LockResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct LockRow {
    pub id: DbId,
    pub reference: String,
    pub amount: Amount,
    pub sender_account_id: DbId,
    pub claim_key: String,
    pub state: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Lock with the state column decoded. The working representation for the
/// ledger service; still carries the claim key, so the same serialization
/// caveat as [`LockRow`] applies.
#[derive(Debug, Clone)]
pub struct Lock {
    pub id: DbId,
    /// Human-shareable code (`LPT-XXXXXXXX`), shown to the sender.
    pub reference: String,
    pub amount: Amount,
    pub sender_account_id: DbId,
    /// SHA-256 hex of the recipient contact + PIN. The sole redemption key.
    pub claim_key: String,
    pub state: LockState,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl TryFrom<LockRow> for Lock {
    type Error = String;

    fn try_from(row: LockRow) -> Result<Self, Self::Error> {
        let state = LockState::from_str(&row.state)
            .ok_or_else(|| format!("lock {} has unknown state '{}'", row.id, row.state))?;
        Ok(Lock {
            id: row.id,
            reference: row.reference,
            amount: row.amount,
            sender_account_id: row.sender_account_id,
            claim_key: row.claim_key,
            state,
            created_at: row.created_at,
            expires_at: row.expires_at,
        })
    }
}

/// DTO for creating a new lock. Timestamps are supplied by the caller so
/// the service layer's clock is the single time source.
#[derive(Debug, Clone)]
pub struct CreateLock {
    pub reference: String,
    pub amount: Amount,
    pub sender_account_id: DbId,
    pub claim_key: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Safe lock representation for API responses (no claim key).
#[derive(Debug, Clone, Serialize)]
pub struct LockResponse {
    pub id: DbId,
    pub reference: String,
    pub amount: Amount,
    pub sender_account_id: DbId,
    pub state: LockState,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl From<Lock> for LockResponse {
    fn from(lock: Lock) -> Self {
        LockResponse {
            id: lock.id,
            reference: lock.reference,
            amount: lock.amount,
            sender_account_id: lock.sender_account_id,
            state: lock.state,
            created_at: lock.created_at,
            expires_at: lock.expires_at,
        }
    }
}
