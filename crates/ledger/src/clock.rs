//! Time source abstraction.
//!
//! All lock timestamps (creation, expiry, audit entries) come from a single
//! [`Clock`] owned by the ledger, so expiry behaviour can be driven
//! deterministically in tests with [`ManualClock`].

use std::sync::Mutex;

use chrono::{Duration, Utc};
use lockpay_core::types::Timestamp;

/// Source of "now" for the ledger.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time. The production clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to. Lets tests cross lock expiry
/// boundaries without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        ManualClock {
            now: Mutex::new(start),
        }
    }

    /// Start at the current wall-clock time.
    pub fn starting_now() -> Self {
        ManualClock::new(Utc::now())
    }

    pub fn set(&self, to: Timestamp) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
