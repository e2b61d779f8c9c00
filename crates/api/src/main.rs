use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lockpay_api::config::{ServerConfig, StoreBackend};
use lockpay_api::router::build_app_router;
use lockpay_api::state::AppState;
use lockpay_db::{LedgerStore, MemoryStore, PgStore};
use lockpay_ledger::{LockLedger, SystemClock};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lockpay_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.store_backend,
        "Loaded server configuration"
    );

    // --- Ledger store ---
    let store: Arc<dyn LedgerStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory ledger store (data is not persisted)");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

            let pool = lockpay_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            lockpay_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            lockpay_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
    };

    // --- Ledger service ---
    let ledger = LockLedger::with_parts(store, Arc::new(SystemClock), config.ledger_config());

    // --- App state ---
    let state = AppState {
        ledger: Arc::new(ledger),
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
