//! Time provider abstraction
//!
//! Event insertion times come from a [`Clock`] so that production code uses
//! real system time while tests drive a controllable one and can place
//! events exactly on a `since` boundary.

use std::fmt::Debug;

use chrono::{DateTime, Utc};

#[cfg(any(test, feature = "testing"))]
use chrono::TimeZone;
#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;

/// A time provider for stamping events at insert time.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock using real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock that starts at a fixed instant and advances one millisecond
/// per reading, so consecutive inserts receive distinct, ordered
/// timestamps.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct FixedClock {
    millis: Mutex<i64>,
}

#[cfg(any(test, feature = "testing"))]
impl FixedClock {
    /// Creates a clock at the given time in milliseconds since the epoch.
    pub fn new(millis: i64) -> Self {
        Self {
            millis: Mutex::new(millis),
        }
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance(&self, ms: i64) {
        *self.millis.lock().unwrap() += ms;
    }

    /// Returns the current time in milliseconds without advancing.
    pub fn get(&self) -> i64 {
        *self.millis.lock().unwrap()
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let mut millis = self.millis.lock().unwrap();
        let t = *millis;
        *millis += 1;
        Utc.timestamp_millis_opt(t)
            .single()
            .expect("fixed clock timestamp in range")
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01 00:00:00 UTC
        Self::new(1704067200000)
    }
}
