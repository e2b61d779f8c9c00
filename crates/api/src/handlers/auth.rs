//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use lockpay_db::models::account::Account;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub contact: String,
}

/// POST /api/v1/auth/login
///
/// Resolve a contact number to its account, creating it with a zero balance
/// on first login. There are no passwords; possession of the contact number
/// is the product's identity model. Logging in twice with the same contact
/// returns the same account.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<Account>>> {
    let account = state.ledger.authenticate(&input.contact).await?;

    Ok(Json(DataResponse { data: account }))
}
