//! Stream plumbing shared by every stage.
//!
//! A stage is a spawned task that owns the sending half of a small bounded
//! channel and hands the receiving half to its caller as a [`StageStream`].
//! Every blocking send or receive inside a stage is raced against the stage's
//! [`CancellationToken`], so a fired token stops the stage within one
//! `select!` step.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

/// Capacity of the channel behind every stage output.
pub const STAGE_BUFFER: usize = 1;

/// The output of a stage: an ordered stream closed once by its producer.
///
/// `None` from `next()` means the producer finished or was cancelled.
pub type StageStream<T> = ReceiverStream<T>;

/// A stream of liveness pulses.
pub type Heartbeat = StageStream<()>;

/// Create a stage channel.
pub(crate) fn channel<T>() -> (mpsc::Sender<T>, StageStream<T>) {
    let (tx, rx) = mpsc::channel(STAGE_BUFFER);
    (tx, ReceiverStream::new(rx))
}

/// Spawn the body of a stage and return its output.
///
/// The sender is moved into the body; dropping it when the body returns is
/// what closes the output.
pub(crate) fn spawn_stage<T, F, Fut>(body: F) -> StageStream<T>
where
    T: Send + 'static,
    F: FnOnce(mpsc::Sender<T>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (tx, out) = channel();
    tokio::spawn(body(tx));
    out
}

/// Send `value`, giving up if `token` fires first.
///
/// Returns `false` when the stage should stop: either the token fired or the
/// consumer dropped its stream.
pub(crate) async fn send_or_cancel<T>(
    token: &CancellationToken,
    tx: &mpsc::Sender<T>,
    value: T,
) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        sent = tx.send(value) => match sent {
            Ok(()) => true,
            Err(_) => {
                tracing::trace!("stage consumer dropped; stopping");
                false
            }
        },
    }
}

/// Receive the next value, giving up if `token` fires first.
///
/// Returns `None` when the input closed or the token fired.
pub(crate) async fn recv_or_cancel<T>(
    token: &CancellationToken,
    input: &mut StageStream<T>,
) -> Option<T> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        next = input.next() => next,
    }
}

/// Result of a [`try_pulse`] attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseOutcome {
    /// The receiver had room and the pulse was queued.
    Delivered,
    /// The receiver was not ready; the pulse was discarded.
    Dropped,
    /// The receiver is gone.
    Closed,
}

/// Emit a heartbeat pulse without blocking.
///
/// Readers of a heartbeat only need to see that pulses keep arriving, so a
/// pulse that cannot be queued immediately is dropped rather than waited on.
pub fn try_pulse(tx: &mpsc::Sender<()>) -> PulseOutcome {
    match tx.try_send(()) {
        Ok(()) => PulseOutcome::Delivered,
        Err(TrySendError::Full(())) => PulseOutcome::Dropped,
        Err(TrySendError::Closed(())) => PulseOutcome::Closed,
    }
}

/// Create a heartbeat channel for a hand-written ward.
pub fn heartbeat() -> (mpsc::Sender<()>, Heartbeat) {
    channel()
}
