//! The start-function contract shared by wards and stewards.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::stage::Heartbeat;

/// A long-running unit of work that reports liveness through a heartbeat.
///
/// `start` must return promptly: the work itself runs on a task spawned by
/// the implementation. The work should pulse the returned [`Heartbeat`] about
/// every `pulse_interval` (see [`try_pulse`](crate::stage::try_pulse)) and
/// stop, closing the heartbeat, once `token` fires.
///
/// Any `Fn(CancellationToken, Duration) -> Heartbeat` closure is a ward, and
/// so is a [`Steward`](super::Steward), which lets stewards supervise each
/// other.
pub trait Ward: Send + Sync + 'static {
    /// Start the work and return its heartbeat.
    fn start(&self, token: CancellationToken, pulse_interval: Duration) -> Heartbeat;
}

impl<F> Ward for F
where
    F: Fn(CancellationToken, Duration) -> Heartbeat + Send + Sync + 'static,
{
    fn start(&self, token: CancellationToken, pulse_interval: Duration) -> Heartbeat {
        self(token, pulse_interval)
    }
}

/// Pin a closure to the [`Ward`] signature.
///
/// Closures passed straight to a generic `W: Ward` parameter sometimes need
/// help with argument type inference; this is that help.
pub fn ward_fn<F>(f: F) -> F
where
    F: Fn(CancellationToken, Duration) -> Heartbeat + Send + Sync + 'static,
{
    f
}
