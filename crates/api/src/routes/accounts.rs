//! Route definitions for the `/accounts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Routes mounted at `/accounts`.
///
/// ```text
/// GET  /{id}           -> account detail
/// POST /{id}/deposit   -> credit the balance
/// GET  /{id}/history   -> transaction history, newest first
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(accounts::get_account))
        .route("/{id}/deposit", post(accounts::deposit))
        .route("/{id}/history", get(accounts::history))
}
