use crate::lock_state::LockState;
use crate::money;
use crate::types::{Amount, Timestamp};

/// Generic message for failed claim-key lookups.
///
/// Deliberately identical whether the contact/PIN pair never matched a lock,
/// or a matching lock was already claimed, refunded, or observed as expired.
/// An unauthenticated prober must not be able to tell these cases apart.
pub const CLAIM_NOT_FOUND_MSG: &str =
    "no locked funds found for this contact and PIN combination";

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Malformed amount, contact, PIN, or duration.
    #[error("{0}")]
    InvalidArgument(String),

    /// Unknown account, lock id, or claim key.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// The sender's balance does not cover the requested amount.
    #[error("insufficient balance: {} available", money::format_amount(*.available))]
    InsufficientBalance { available: Amount },

    /// An active lock already exists for the same claim key.
    #[error("this contact already has locked funds with this PIN; use a different PIN")]
    DuplicateLock,

    /// The lock exists but its expiry has passed.
    #[error("lock expired at {expired_at}")]
    Expired { expired_at: Timestamp },

    /// The requested state transition is not allowed by the lock state machine.
    #[error("invalid lock state transition: {from} -> {to}")]
    InvalidState { from: LockState, to: LockState },

    /// A storage backend failure (sanitized before reaching clients).
    #[error("storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// The generic claim-lookup failure. Transport layers should render this
    /// with [`CLAIM_NOT_FOUND_MSG`] rather than the entity wording.
    pub fn claim_not_found() -> Self {
        LedgerError::NotFound { entity: "claim" }
    }
}
