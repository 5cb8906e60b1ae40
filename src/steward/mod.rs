//! Heartbeat supervision.
//!
//! A [`Steward`] starts a [`Ward`], watches its heartbeat and replaces it when
//! the heartbeat goes quiet for longer than the configured timeout. The
//! steward pulses its own heartbeat toward its caller on a separate clock, so
//! a steward is itself a ward and can be supervised by another steward.
//!
//! ## Control loop
//! ```text
//! start ──► ward_token = token.child_token()
//!           ward.start(ward_token, timeout / 2)
//!
//! 'monitor: loop {
//!   arm sleep(timeout)
//!   loop select! {
//!     ├─ token cancelled    ─► close heartbeat, stop
//!     ├─ own pulse tick     ─► try_pulse (dropped if caller is busy)
//!     ├─ ward heartbeat     ─► continue 'monitor (rearm)
//!     └─ timeout elapsed    ─► restarts += 1
//!                              ward_token.cancel() (not awaited)
//!                              start a fresh ward on a new child token
//!                              continue 'monitor (rearm)
//!   }
//! }
//! ```
//!
//! ## Rules
//! - Exactly one ward is monitored at a time; a retired ward's heartbeat is
//!   dropped before its replacement starts.
//! - The timeout window resets on ward heartbeats and restarts only, never on
//!   the steward's own pulses.
//! - Restarts are unconditional and unlimited; they are reported through
//!   `tracing` and [`Steward::restarts`], never as an error.

mod ward;

pub use ward::{ward_fn, Ward};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::StewardConfig;
use crate::error::Result;
use crate::stage::{heartbeat, try_pulse, Heartbeat, PulseOutcome};

/// Supervises a [`Ward`] and restarts it when its heartbeat times out.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use stageward::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() -> Result<()> {
/// // A ward that never pulses, so it is restarted every 50ms.
/// let silent = ward_fn(|token: CancellationToken, _pulse: Duration| {
///     let (tx, hb) = heartbeat();
///     tokio::spawn(async move {
///         token.cancelled().await;
///         drop(tx);
///     });
///     hb
/// });
///
/// let steward = Steward::new(Duration::from_millis(50), silent)?;
/// let token = CancellationToken::new();
/// let _heartbeat = steward.start(token.clone(), Duration::from_millis(10));
///
/// tokio::time::sleep(Duration::from_millis(120)).await;
/// token.cancel();
/// assert!(steward.restarts() >= 1);
/// # Ok(())
/// # }
/// ```
pub struct Steward<W> {
    config: StewardConfig,
    ward: Arc<W>,
    restarts: Arc<AtomicU64>,
}

impl<W: Ward> Steward<W> {
    /// Create a steward that restarts `ward` after `timeout` of silence.
    pub fn new(timeout: Duration, ward: W) -> Result<Self> {
        Self::from_config(StewardConfig::new(timeout), ward)
    }

    /// Create a steward from a full configuration.
    pub fn from_config(config: StewardConfig, ward: W) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ward: Arc::new(ward),
            restarts: Arc::new(AtomicU64::new(0)),
        })
    }

    /// The configuration this steward runs with.
    pub fn config(&self) -> &StewardConfig {
        &self.config
    }

    /// Total number of restarts across every run of this steward.
    pub fn restarts(&self) -> u64 {
        self.restarts.load(Ordering::Relaxed)
    }

    /// Start with the configured outward pulse interval.
    pub fn spawn(&self, token: CancellationToken) -> Heartbeat {
        self.start(token, self.config.pulse_interval)
    }
}

impl<W> Clone for Steward<W> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            ward: Arc::clone(&self.ward),
            restarts: Arc::clone(&self.restarts),
        }
    }
}

impl<W: Ward> Ward for Steward<W> {
    fn start(&self, token: CancellationToken, pulse_interval: Duration) -> Heartbeat {
        let (tx, out) = heartbeat();
        let monitor = Monitor {
            ward: Arc::clone(&self.ward),
            timeout: self.config.timeout,
            ward_interval: self.config.ward_pulse_interval(),
            restarts: Arc::clone(&self.restarts),
        };
        tokio::spawn(monitor.run(token, pulse_interval, tx));
        out
    }
}

/// Create a steward that restarts `ward` after `timeout` of silence.
pub fn new_steward<W: Ward>(timeout: Duration, ward: W) -> Result<Steward<W>> {
    Steward::new(timeout, ward)
}

/// State owned by one running control loop.
struct Monitor<W> {
    ward: Arc<W>,
    timeout: Duration,
    ward_interval: Duration,
    restarts: Arc<AtomicU64>,
}

impl<W: Ward> Monitor<W> {
    async fn run(self, token: CancellationToken, pulse_interval: Duration, tx: mpsc::Sender<()>) {
        let ward_interval = self.ward_interval;
        let mut ward_token = token.child_token();
        let mut ward_heartbeat = self.ward.start(ward_token.clone(), ward_interval);
        // Cleared when the ward closes its heartbeat; a closed ward is silent.
        let mut ward_open = true;
        let mut pulse = pulse_ticker(pulse_interval);

        debug!(timeout = ?self.timeout, ?pulse_interval, "steward started");

        'monitor: loop {
            let deadline = time::sleep(self.timeout);
            tokio::pin!(deadline);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break 'monitor,
                    _ = tick(&mut pulse) => {
                        if try_pulse(&tx) == PulseOutcome::Closed {
                            debug!("steward heartbeat dropped by caller");
                            ward_token.cancel();
                            break 'monitor;
                        }
                    }
                    beat = ward_heartbeat.next(), if ward_open => match beat {
                        Some(()) => continue 'monitor,
                        None => ward_open = false,
                    },
                    _ = &mut deadline => {
                        let restarts = self.restarts.fetch_add(1, Ordering::Relaxed) + 1;
                        warn!(restarts, timeout = ?self.timeout, "steward: ward unhealthy; restarting");
                        #[cfg(feature = "metrics")]
                        metrics::counter!("stageward_steward_restarts_total").increment(1);

                        ward_token.cancel();
                        drop(ward_heartbeat);
                        ward_token = token.child_token();
                        ward_heartbeat = self.ward.start(ward_token.clone(), ward_interval);
                        ward_open = true;
                        continue 'monitor;
                    }
                }
            }
        }

        debug!(restarts = self.restarts.load(Ordering::Relaxed), "steward stopped");
    }
}

/// Ticker for outward pulses. A zero interval never ticks.
fn pulse_ticker(interval: Duration) -> Option<Interval> {
    if interval.is_zero() {
        return None;
    }
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    Some(ticker)
}

async fn tick(pulse: &mut Option<Interval>) {
    match pulse {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
