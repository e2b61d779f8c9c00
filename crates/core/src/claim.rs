//! Claim-key derivation.
//!
//! A claim key is the SHA-256 hex digest of the recipient contact and the
//! sender-chosen PIN, joined with a `|` separator. The separator keeps
//! distinct (contact, pin) pairs from colliding under plain concatenation:
//! `("0821234567", "1234")` and `("08212345671", "234")` hash differently.
//!
//! The raw PIN is never persisted; the key is the only durable artifact.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Derived lookup key for a lock. Wraps the 64-char lowercase hex digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimKey(String);

impl ClaimKey {
    /// Derive the claim key for a recipient contact and PIN.
    ///
    /// Inputs are used exactly as given; callers normalize first (see
    /// `validation::normalize_contact`).
    pub fn derive(contact: &str, pin: &str) -> Self {
        let hash = Sha256::digest(format!("{contact}|{pin}").as_bytes());
        ClaimKey(format!("{hash:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
