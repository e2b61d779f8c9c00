//! Handlers for the `/stats` resource.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use lockpay_core::types::Amount;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Ledger-wide sums. `total` only moves on deposits; lock, redeem, and
/// refund shuffle value between the two components without changing it.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub sum_balances: Amount,
    pub sum_active_locks: Amount,
    pub total: Amount,
}

/// GET /api/v1/stats
pub async fn get_stats(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<StatsResponse>>> {
    let totals = state.ledger.totals().await?;

    Ok(Json(DataResponse {
        data: StatsResponse {
            sum_balances: totals.sum_balances,
            sum_active_locks: totals.sum_active_locks,
            total: totals.total(),
        },
    }))
}
