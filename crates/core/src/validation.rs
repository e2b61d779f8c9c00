//! Input validation for ledger operations.
//!
//! Rules match the product's originals: contacts are phone numbers of at
//! least ten digits, PINs are at least four digits, deposits are capped.
//! Every validator takes its bound as a parameter so the service layer can
//! feed configured values; the constants here are the product defaults.

use crate::error::LedgerError;
use crate::money;
use crate::types::Amount;

// ---------------------------------------------------------------------------
// Default bounds
// ---------------------------------------------------------------------------

/// Minimum digits in a contact (phone) number.
pub const MIN_CONTACT_DIGITS: usize = 10;

/// Minimum digits in a lock PIN.
pub const MIN_PIN_DIGITS: usize = 4;

/// Longest allowed lock duration: 30 days.
pub const MAX_LOCK_DURATION_SECS: i64 = 30 * 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Validate and normalize a contact number.
///
/// Allows one leading `+` and common separators (spaces, hyphens), and
/// requires everything else to be ASCII digits. Returns the bare digit
/// string; the normalized contact is what gets stored and hashed, so
/// `"+27 82-123 4567"` and `"27821234567"` resolve to the same account
/// and claim key.
pub fn normalize_contact(raw: &str, min_digits: usize) -> Result<String, LedgerError> {
    let contact = raw.trim();
    let rest = contact.strip_prefix('+').unwrap_or(contact);
    let digits: String = rest.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(LedgerError::InvalidArgument(
            "invalid contact number: digits only, optionally prefixed with +".into(),
        ));
    }
    if digits.len() < min_digits {
        return Err(LedgerError::InvalidArgument(format!(
            "invalid contact number: enter a valid {min_digits}-digit phone number"
        )));
    }
    Ok(digits)
}

/// Validate a lock PIN: ASCII digits only, at least `min_digits` long.
pub fn validate_pin(pin: &str, min_digits: usize) -> Result<(), LedgerError> {
    if pin.len() < min_digits || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(LedgerError::InvalidArgument(format!(
            "invalid PIN: must be at least {min_digits} digits"
        )));
    }
    Ok(())
}

/// Validate a generic monetary amount: strictly positive.
pub fn validate_amount(amount: Amount) -> Result<(), LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidArgument(
            "invalid amount: must be greater than R0".into(),
        ));
    }
    Ok(())
}

/// Validate a deposit amount: strictly positive and within the ceiling.
pub fn validate_deposit_amount(amount: Amount, max: Amount) -> Result<(), LedgerError> {
    validate_amount(amount)?;
    if amount > max {
        return Err(LedgerError::InvalidArgument(format!(
            "maximum deposit amount is {}",
            money::format_amount(max)
        )));
    }
    Ok(())
}

/// Validate a lock duration in seconds: strictly positive, within the cap.
pub fn validate_lock_duration(secs: i64, max_secs: i64) -> Result<(), LedgerError> {
    if secs <= 0 {
        return Err(LedgerError::InvalidArgument(
            "invalid lock duration: must be greater than zero".into(),
        ));
    }
    if secs > max_secs {
        return Err(LedgerError::InvalidArgument(format!(
            "invalid lock duration: must not exceed {max_secs} seconds"
        )));
    }
    Ok(())
}
