use lockpay_core::types::Amount;
use lockpay_core::{money, validation};
use lockpay_ledger::LedgerConfig;

/// Which storage backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store; data lives only as long as the server. The default,
    /// suited to local development and demos.
    Memory,
    /// Postgres via sqlx; requires `DATABASE_URL`.
    Postgres,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Storage backend selection (default: memory).
    pub store_backend: StoreBackend,
    /// Largest single deposit in cents (default: `1000000`, i.e. R10,000).
    pub max_deposit: Amount,
    /// Minimum digits a contact number must carry (default: `10`).
    pub min_contact_digits: usize,
    /// Minimum digits a PIN must carry (default: `4`).
    pub min_pin_digits: usize,
    /// Lock duration applied when a request omits one, in seconds
    /// (default: `86400`, i.e. 24 hours).
    pub default_lock_duration_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `STORE_BACKEND`              | `memory`                   |
    /// | `MAX_DEPOSIT_CENTS`          | `1000000`                  |
    /// | `MIN_CONTACT_DIGITS`         | `10`                       |
    /// | `MIN_PIN_DIGITS`             | `4`                        |
    /// | `DEFAULT_LOCK_DURATION_SECS` | `86400`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let store_backend = match std::env::var("STORE_BACKEND").as_deref() {
            Ok("postgres") => StoreBackend::Postgres,
            Ok("memory") | Err(_) => StoreBackend::Memory,
            Ok(other) => panic!("STORE_BACKEND must be 'memory' or 'postgres', got '{other}'"),
        };

        let max_deposit: Amount = std::env::var("MAX_DEPOSIT_CENTS")
            .unwrap_or_else(|_| money::MAX_DEPOSIT_CENTS.to_string())
            .parse()
            .expect("MAX_DEPOSIT_CENTS must be a valid i64");

        let min_contact_digits: usize = std::env::var("MIN_CONTACT_DIGITS")
            .unwrap_or_else(|_| validation::MIN_CONTACT_DIGITS.to_string())
            .parse()
            .expect("MIN_CONTACT_DIGITS must be a valid usize");

        let min_pin_digits: usize = std::env::var("MIN_PIN_DIGITS")
            .unwrap_or_else(|_| validation::MIN_PIN_DIGITS.to_string())
            .parse()
            .expect("MIN_PIN_DIGITS must be a valid usize");

        let default_lock_duration_secs: i64 = std::env::var("DEFAULT_LOCK_DURATION_SECS")
            .unwrap_or_else(|_| lockpay_ledger::config::DEFAULT_LOCK_DURATION_SECS.to_string())
            .parse()
            .expect("DEFAULT_LOCK_DURATION_SECS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store_backend,
            max_deposit,
            min_contact_digits,
            min_pin_digits,
            default_lock_duration_secs,
        }
    }

    /// Ledger policy derived from this configuration.
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            max_deposit: self.max_deposit,
            min_contact_digits: self.min_contact_digits,
            min_pin_digits: self.min_pin_digits,
            default_lock_duration_secs: self.default_lock_duration_secs,
            max_lock_duration_secs: validation::MAX_LOCK_DURATION_SECS,
        }
    }
}
