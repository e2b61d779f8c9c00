//! Account entity model.

use serde::Serialize;
use sqlx::FromRow;

use lockpay_core::types::{Amount, DbId, Timestamp};

/// Account row from the `accounts` table.
///
/// Accounts are keyed by contact number, created on first authentication,
/// and never deleted. The balance is integer cents and non-negative by
/// invariant (enforced with a CHECK constraint and conditional debits).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    /// Phone number that identifies this account; unique.
    pub contact_key: String,
    /// Current balance in cents.
    pub balance: Amount,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
