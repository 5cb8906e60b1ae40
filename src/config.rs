//! Steward configuration.

use std::time::Duration;

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timing for a [`Steward`](crate::steward::Steward).
///
/// The ward is started with half of `timeout` as its own pulse interval, so a
/// healthy ward pulses about twice per timeout window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StewardConfig {
    /// How long the ward may stay silent before it is restarted.
    pub timeout: Duration,
    /// Interval of the steward's own outward pulses when started with
    /// [`Steward::spawn`](crate::steward::Steward::spawn).
    pub pulse_interval: Duration,
}

impl Default for StewardConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
            pulse_interval: Duration::from_millis(500),
        }
    }
}

impl StewardConfig {
    /// Create a config with the given timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Set the ward timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the outward pulse interval
    pub fn pulse_interval(mut self, interval: Duration) -> Self {
        self.pulse_interval = interval;
        self
    }

    /// Pulse interval handed to the ward.
    pub fn ward_pulse_interval(&self) -> Duration {
        self.timeout / 2
    }

    /// Reject settings the steward cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::invalid_timeout(self.timeout));
        }
        Ok(())
    }
}
