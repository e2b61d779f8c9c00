//! Per-claim-key serialization.
//!
//! Lock creation, redemption, and refund for the same claim key must not
//! interleave, otherwise two concurrent redeems could both observe an active
//! lock before either claims it. The registry hands out one async mutex per
//! claim key; operations on different keys proceed in parallel.
//!
//! This in-process guard is the first line of defence. The storage layer's
//! compare-and-set transitions and the partial unique index on active claim
//! keys remain authoritative when several API processes share one database.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Entries with no waiters are swept once the registry grows past this.
const SHRINK_THRESHOLD: usize = 64;

/// Registry of per-claim-key mutexes.
#[derive(Debug, Default)]
pub struct ClaimKeyLocks {
    entries: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ClaimKeyLocks {
    pub fn new() -> Self {
        ClaimKeyLocks::default()
    }

    /// Acquire the mutex for `claim_key`, waiting behind any holder of the
    /// same key. The guard releases on drop.
    pub async fn acquire(&self, claim_key: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut entries = self.entries.lock().await;
            if entries.len() > SHRINK_THRESHOLD {
                entries.retain(|_, m| Arc::strong_count(m) > 1);
            }
            Arc::clone(entries.entry(claim_key.to_string()).or_default())
        };
        entry.lock_owned().await
    }
}
