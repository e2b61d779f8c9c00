//! Money representation and display formatting.
//!
//! All amounts in the workspace are integer cents (`Amount = i64`); floating
//! point never touches balances. Display strings use the product currency
//! symbol with two decimals and thousands grouping, e.g. `R1,234.56`.

use crate::types::Amount;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Cents per whole currency unit.
pub const CENTS_PER_RAND: Amount = 100;

/// Default per-deposit ceiling: R10,000.00.
pub const MAX_DEPOSIT_CENTS: Amount = 1_000_000;

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format an amount in cents as a display string, e.g. `R1,234.56`.
///
/// Negative amounts render with a leading sign (`-R5.00`). Balances are
/// never negative by invariant, but deltas in log lines can be.
pub fn format_amount(cents: Amount) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = abs / CENTS_PER_RAND as u64;
    let frac = abs % CENTS_PER_RAND as u64;
    format!("{sign}R{}.{frac:02}", group_thousands(whole))
}

/// Insert `,` separators every three digits: `1234567` -> `"1,234,567"`.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
