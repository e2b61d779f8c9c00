pub mod accounts;
pub mod auth;
pub mod health;
pub mod locks;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                  resolve contact to account (POST)
///
/// /accounts/{id}               account detail (GET)
/// /accounts/{id}/deposit       credit the balance (POST)
/// /accounts/{id}/history       transaction history (GET)
///
/// /locks                       lock funds for a contact + PIN (POST)
/// /locks/probe                 look up a lock without claiming (POST)
/// /locks/redeem                claim a lock (POST)
/// /locks/{id}/refund           refund an expired lock (POST)
///
/// /stats                       ledger-wide totals (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/accounts", accounts::router())
        .nest("/locks", locks::router())
        .merge(stats::router())
}
