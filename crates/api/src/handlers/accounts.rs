//! Handlers for the `/accounts` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use lockpay_core::types::{Amount, DbId};
use lockpay_db::models::account::Account;
use lockpay_db::models::audit::AuditRecord;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /accounts/{id}/deposit`.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// Integer cents; strictly positive, capped by the deposit ceiling.
    pub amount_cents: Amount,
}

/// Query parameters for `GET /accounts/{id}/history`.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// GET /api/v1/accounts/{id}
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Account>>> {
    let account = state.ledger.account(id).await?;

    Ok(Json(DataResponse { data: account }))
}

/// POST /api/v1/accounts/{id}/deposit
///
/// Credit the account balance and record the deposit in the history.
pub async fn deposit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DepositRequest>,
) -> AppResult<Json<DataResponse<Account>>> {
    let account = state.ledger.deposit(id, input.amount_cents).await?;

    Ok(Json(DataResponse { data: account }))
}

/// GET /api/v1/accounts/{id}/history
///
/// Transaction history for the account's contact, newest first. Covers both
/// sides: records where the contact acted and records where it was the lock
/// recipient.
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<DataResponse<Vec<AuditRecord>>>> {
    // 1. Reject nonsense page sizes up front; the store would clamp them
    //    silently, which hides caller bugs.
    if let Some(limit) = params.limit {
        if limit <= 0 {
            return Err(AppError::BadRequest("limit must be a positive number".into()));
        }
    }

    // 2. Resolve the account; history is keyed by its contact.
    let account = state.ledger.account(id).await?;

    // 3. Fetch records for that contact, limit capped by the store.
    let records = state
        .ledger
        .history(&account.contact_key, params.limit)
        .await?;

    Ok(Json(DataResponse { data: records }))
}
