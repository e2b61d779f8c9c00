//! Handlers for the `/locks` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use lockpay_core::types::{Amount, DbId};
use lockpay_db::models::account::Account;
use lockpay_db::models::lock::LockResponse;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /locks`.
#[derive(Debug, Deserialize)]
pub struct CreateLockRequest {
    pub sender_account_id: DbId,
    pub amount_cents: Amount,
    pub recipient_contact: String,
    pub pin: String,
    /// Optional override; defaults to the configured lock duration.
    pub lock_duration_secs: Option<i64>,
}

/// Request body for `POST /locks/probe`.
#[derive(Debug, Deserialize)]
pub struct ProbeRequest {
    pub contact: String,
    pub pin: String,
}

/// Request body for `POST /locks/redeem`.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub contact: String,
    pub pin: String,
    /// Contact whose account receives the funds; usually the recipient's
    /// own number.
    pub destination_contact: String,
}

/// Successful redemption payload: the claimed lock and the credited account.
#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub lock: LockResponse,
    pub destination: Account,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/locks
///
/// Move funds from the sender's balance into a new lock claimable with the
/// recipient contact + PIN pair.
pub async fn create_lock(
    State(state): State<AppState>,
    Json(input): Json<CreateLockRequest>,
) -> AppResult<impl IntoResponse> {
    let lock = state
        .ledger
        .lock(
            input.sender_account_id,
            input.amount_cents,
            &input.recipient_contact,
            &input.pin,
            input.lock_duration_secs,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: LockResponse::from(lock),
        }),
    ))
}

/// POST /api/v1/locks/probe
///
/// Look up an active lock by contact + PIN without claiming it. A POST
/// because the PIN travels in the body; it must never appear in a URL.
pub async fn probe_lock(
    State(state): State<AppState>,
    Json(input): Json<ProbeRequest>,
) -> AppResult<Json<DataResponse<LockResponse>>> {
    let lock = state.ledger.probe_lock(&input.contact, &input.pin).await?;

    Ok(Json(DataResponse {
        data: LockResponse::from(lock),
    }))
}

/// POST /api/v1/locks/redeem
///
/// Claim a lock with its contact + PIN pair and credit the destination
/// contact's account, creating that account if needed. Each lock pays out
/// at most once.
pub async fn redeem_lock(
    State(state): State<AppState>,
    Json(input): Json<RedeemRequest>,
) -> AppResult<Json<DataResponse<RedeemResponse>>> {
    let redemption = state
        .ledger
        .redeem(&input.contact, &input.pin, &input.destination_contact)
        .await?;

    Ok(Json(DataResponse {
        data: RedeemResponse {
            lock: LockResponse::from(redemption.lock),
            destination: redemption.destination,
        },
    }))
}

/// POST /api/v1/locks/{id}/refund
///
/// Refund an expired lock to its sender. Rejected while the lock is still
/// inside its window, and after it has been claimed or already refunded.
pub async fn refund_lock(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Account>>> {
    let account = state.ledger.refund_expired(id).await?;

    Ok(Json(DataResponse { data: account }))
}
