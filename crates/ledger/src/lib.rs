//! Ledger service for LockPay.
//!
//! Sits between the HTTP layer and storage: [`LockLedger`] owns the money
//! rules (validation, conservation, one claim per lock, lazy expiry) while
//! delegating persistence to any [`lockpay_db::LedgerStore`]. Time comes
//! from a pluggable [`Clock`] so tests can drive expiry deterministically.

pub mod clock;
pub mod config;
pub mod keys;
pub mod ledger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use ledger::{LockLedger, Redemption};
