//! Audit record kinds and history descriptions.
//!
//! Every balance-changing operation appends one audit record; the records
//! double as the product's per-user transaction history, so the description
//! strings here are the exact lines users see.

use serde::{Deserialize, Serialize};

use crate::money::format_amount;
use crate::types::Amount;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditKind {
    Deposit,
    Lock,
    Redeem,
    Refund,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Lock => "lock",
            Self::Redeem => "redeem",
            Self::Refund => "refund",
        }
    }

    /// Parse a stored kind string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(Self::Deposit),
            "lock" => Some(Self::Lock),
            "redeem" => Some(Self::Redeem),
            "refund" => Some(Self::Refund),
            _ => None,
        }
    }

    /// All valid kind values as stored.
    pub const ALL: &'static [&'static str] = &["deposit", "lock", "redeem", "refund"];
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// History descriptions
// ---------------------------------------------------------------------------

/// History line for a deposit.
pub fn deposit_description(amount: Amount) -> String {
    format!("Deposited {} to wallet", format_amount(amount))
}

/// History line for a new lock, naming the recipient contact.
pub fn lock_description(amount: Amount, recipient_contact: &str) -> String {
    format!("Locked {} for {recipient_contact}", format_amount(amount))
}

/// History line for a successful redeem.
pub fn redeem_description(amount: Amount) -> String {
    format!("Redeemed {} - sent to bank account", format_amount(amount))
}

/// History line for an expired-lock refund back to the sender.
pub fn refund_description(amount: Amount) -> String {
    format!("Refunded {} to sender", format_amount(amount))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
