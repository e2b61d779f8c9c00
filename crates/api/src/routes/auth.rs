//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login    -> login (contact number only, no password)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(auth::login))
}
