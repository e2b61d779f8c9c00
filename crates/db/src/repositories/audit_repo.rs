//! Repository for the `audit_log` table.

use sqlx::PgPool;

use crate::models::audit::{AuditRow, CreateAuditRecord};
use crate::store::clamp_history_limit;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, kind, amount, contact_key, counterparty_contact, \
                        lock_id, lock_reference, description, created_at";

/// Provides append and listing operations for the audit log.
pub struct AuditRepo;

impl AuditRepo {
    /// Append an audit record, returning the created row.
    pub async fn append(
        pool: &PgPool,
        input: &CreateAuditRecord,
    ) -> Result<AuditRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_log
                 (kind, amount, contact_key, counterparty_contact,
                  lock_id, lock_reference, description, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditRow>(&query)
            .bind(input.kind.as_str())
            .bind(input.amount)
            .bind(&input.contact_key)
            .bind(&input.counterparty_contact)
            .bind(input.lock_id)
            .bind(&input.lock_reference)
            .bind(&input.description)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// List records where the contact is the acting or counterparty side,
    /// newest first. `id` breaks ties between same-instant records.
    pub async fn list_for_contact(
        pool: &PgPool,
        contact_key: &str,
        limit: Option<i64>,
    ) -> Result<Vec<AuditRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_log
             WHERE contact_key = $1 OR counterparty_contact = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, AuditRow>(&query)
            .bind(contact_key)
            .bind(clamp_history_limit(limit))
            .fetch_all(pool)
            .await
    }
}
