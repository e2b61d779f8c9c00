//! Ledger policy knobs.

use lockpay_core::money;
use lockpay_core::types::Amount;
use lockpay_core::validation;

/// Lock duration applied when the caller does not specify one: 24 hours.
pub const DEFAULT_LOCK_DURATION_SECS: i64 = 24 * 60 * 60;

/// Policy limits for ledger operations. Defaults mirror the product rules;
/// the API layer may override them from the environment.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Largest single deposit accepted, in cents.
    pub max_deposit: Amount,
    /// Minimum digits a contact number must carry.
    pub min_contact_digits: usize,
    /// Minimum digits a PIN must carry.
    pub min_pin_digits: usize,
    /// Lock duration when the caller does not supply one, in seconds.
    pub default_lock_duration_secs: i64,
    /// Longest lock duration a caller may request, in seconds.
    pub max_lock_duration_secs: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            max_deposit: money::MAX_DEPOSIT_CENTS,
            min_contact_digits: validation::MIN_CONTACT_DIGITS,
            min_pin_digits: validation::MIN_PIN_DIGITS,
            default_lock_duration_secs: DEFAULT_LOCK_DURATION_SECS,
            max_lock_duration_secs: validation::MAX_LOCK_DURATION_SECS,
        }
    }
}
