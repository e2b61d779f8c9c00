//! Human-readable lock reference codes.
//!
//! Every lock gets a short reference (e.g. `LPT-7K2M9QAX`) that senders and
//! recipients can quote in support conversations without revealing the claim
//! key. References are not secrets and carry no entropy guarantees beyond
//! collision avoidance; the Postgres schema backstops them with a unique
//! constraint.

use rand::Rng;

/// Prefix shared by all lock references.
pub const REFERENCE_PREFIX: &str = "LPT-";

/// Length of the random suffix after the prefix.
pub const REFERENCE_SUFFIX_LENGTH: usize = 8;

/// Characters used in the suffix. Uppercase-only so references survive being
/// read over the phone or typed from a screenshot.
const REFERENCE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a new lock reference, e.g. `LPT-7K2M9QAX`.
pub fn generate_reference() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..REFERENCE_SUFFIX_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..REFERENCE_CHARSET.len());
            REFERENCE_CHARSET[idx] as char
        })
        .collect();
    format!("{REFERENCE_PREFIX}{suffix}")
}
