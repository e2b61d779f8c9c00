use std::sync::Arc;

use lockpay_ledger::LockLedger;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The ledger service over whichever store the binary selected.
    pub ledger: Arc<LockLedger>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
