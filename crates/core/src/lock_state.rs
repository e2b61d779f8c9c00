//! Lock lifecycle states and transition rules.
//!
//! A lock is born `Active` and moves one way:
//!
//! - `Active`  -> `Claimed`  (successful redeem)
//! - `Active`  -> `Expired`  (expiry observed at access time)
//! - `Expired` -> `Refunded` (sender recovers the funds)
//!
//! `Claimed` and `Refunded` are terminal. There is no path back to
//! `Active`, which is what makes a lock one-time claimable.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    Active,
    Claimed,
    Expired,
    Refunded,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Claimed => "claimed",
            Self::Expired => "expired",
            Self::Refunded => "refunded",
        }
    }

    /// Parse a stored state string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "claimed" => Some(Self::Claimed),
            "expired" => Some(Self::Expired),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// All valid state values as stored.
    pub const ALL: &'static [&'static str] = &["active", "claimed", "expired", "refunded"];
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Returns the set of states that `from` may transition to.
pub fn valid_transitions(from: LockState) -> &'static [LockState] {
    match from {
        LockState::Active => &[LockState::Claimed, LockState::Expired],
        LockState::Expired => &[LockState::Refunded],
        LockState::Claimed | LockState::Refunded => &[],
    }
}

/// Validate that a transition from `current` to `next` is allowed.
pub fn validate_transition(current: LockState, next: LockState) -> Result<(), LedgerError> {
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(LedgerError::InvalidState {
            from: current,
            to: next,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
