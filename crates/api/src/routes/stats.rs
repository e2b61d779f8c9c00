//! Route definitions for the `/stats` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes merged at the API root.
///
/// ```text
/// GET /stats    -> ledger-wide totals
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats::get_stats))
}
