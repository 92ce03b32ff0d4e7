/*!
 * Lock Configuration
 *
 * Polling behaviour for the process-external locks. Durations serialise as
 * whole milliseconds.
 */

use crate::core::limits::{
    DEFAULT_LOCK_POLL_INTERVAL, FAST_LOCK_POLL_INTERVAL, LOCK_POLL_ENV, SLOW_LOCK_POLL_INTERVAL,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    /// Delay between acquisition attempts while contended
    #[serde(rename = "poll_interval_ms", with = "duration_ms")]
    pub poll_interval: Duration,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_LOCK_POLL_INTERVAL,
        }
    }
}

impl LockConfig {
    /// Short poll interval for locks expected to free up quickly
    pub const fn fast_poll() -> Self {
        Self {
            poll_interval: FAST_LOCK_POLL_INTERVAL,
        }
    }

    /// Long poll interval for locks held across long operations
    pub const fn slow_poll() -> Self {
        Self {
            poll_interval: SLOW_LOCK_POLL_INTERVAL,
        }
    }

    pub const fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Defaults, with the poll interval overridable via `WAITKIT_LOCK_POLL_MS`
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(LOCK_POLL_ENV).ok())
    }

    fn from_env_value(raw: Option<String>) -> Self {
        match raw.and_then(|value| value.trim().parse::<u64>().ok()) {
            Some(ms) if ms > 0 => Self::with_poll_interval(Duration::from_millis(ms)),
            _ => Self::default(),
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis().min(u64::MAX as u128) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
