//! Audit log entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use lockpay_core::audit::AuditKind;
use lockpay_core::types::{Amount, DbId, Timestamp};

/// Raw audit row from the `audit_log` table, kind still as stored text.
#[derive(Debug, Clone, FromRow)]
pub struct AuditRow {
    pub id: DbId,
    pub kind: String,
    pub amount: Amount,
    pub contact_key: String,
    pub counterparty_contact: Option<String>,
    pub lock_id: Option<DbId>,
    pub lock_reference: Option<String>,
    pub description: String,
    pub created_at: Timestamp,
}

/// Audit record with the kind decoded. Append-only; doubles as the
/// product's per-user transaction history.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub id: DbId,
    pub kind: AuditKind,
    pub amount: Amount,
    /// Contact of the acting side (depositor, sender, redeemer).
    pub contact_key: String,
    /// Recipient contact for lock records; `None` otherwise.
    pub counterparty_contact: Option<String>,
    pub lock_id: Option<DbId>,
    pub lock_reference: Option<String>,
    /// Human history line, e.g. `"Deposited R150.00 to wallet"`.
    pub description: String,
    pub created_at: Timestamp,
}

impl TryFrom<AuditRow> for AuditRecord {
    type Error = String;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        let kind = AuditKind::from_str(&row.kind)
            .ok_or_else(|| format!("audit record {} has unknown kind '{}'", row.id, row.kind))?;
        Ok(AuditRecord {
            id: row.id,
            kind,
            amount: row.amount,
            contact_key: row.contact_key,
            counterparty_contact: row.counterparty_contact,
            lock_id: row.lock_id,
            lock_reference: row.lock_reference,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

/// DTO for appending an audit record. `created_at` is supplied by the
/// caller so the service layer's clock is the single time source.
#[derive(Debug, Clone)]
pub struct CreateAuditRecord {
    pub kind: AuditKind,
    pub amount: Amount,
    pub contact_key: String,
    pub counterparty_contact: Option<String>,
    pub lock_id: Option<DbId>,
    pub lock_reference: Option<String>,
    pub description: String,
    pub created_at: Timestamp,
}
