//! Route definitions for the `/locks` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::locks;
use crate::state::AppState;

/// Routes mounted at `/locks`.
///
/// Probe and redeem are POSTs because the contact + PIN pair travels in the
/// request body; a PIN must never appear in a URL or server access log.
///
/// ```text
/// POST /              -> lock funds for a contact + PIN
/// POST /probe         -> look up a lock without claiming it
/// POST /redeem        -> claim a lock and credit the destination
/// POST /{id}/refund   -> refund an expired lock to its sender
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(locks::create_lock))
        .route("/probe", post(locks::probe_lock))
        .route("/redeem", post(locks::redeem_lock))
        .route("/{id}/refund", post(locks::refund_lock))
}
