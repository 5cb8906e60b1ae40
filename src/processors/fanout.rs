//! Fan-out of one stream into two.

use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::processors::or_done;
use crate::stage::{channel, StageStream};

/// Duplicate `input` into two independently consumed streams.
///
/// Each output receives every value exactly once and in source order. For
/// each value both outputs are offered a send in the same `select!`; an output
/// that accepts is left out of the next round, and the next value is read
/// only once both have accepted. A fired token abandons the in-flight value
/// for whichever output has not taken it yet.
///
/// An output whose consumer was dropped is skipped from then on. The stage
/// stops when both consumers are gone.
///
/// # Examples
///
/// ```rust
/// use stageward::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let (left, right) = tee(token.clone(), generator(token, vec![1, 2, 3]));
/// let (left, right) = tokio::join!(collect(left), collect(right));
/// assert_eq!(left, vec![1, 2, 3]);
/// assert_eq!(right, vec![1, 2, 3]);
/// # }
/// ```
pub fn tee<T>(token: CancellationToken, input: StageStream<T>) -> (StageStream<T>, StageStream<T>)
where
    T: Clone + Send + 'static,
{
    let (tx_a, out_a) = channel();
    let (tx_b, out_b) = channel();
    let mut input = or_done(token.clone(), input);

    tokio::spawn(async move {
        let (mut open_a, mut open_b) = (true, true);

        while let Some(value) = input.next().await {
            let (mut pending_a, mut pending_b) = (open_a, open_b);

            while pending_a || pending_b {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return,
                    permit = tx_a.reserve(), if pending_a => {
                        pending_a = false;
                        open_a = deliver(permit, &value);
                    }
                    permit = tx_b.reserve(), if pending_b => {
                        pending_b = false;
                        open_b = deliver(permit, &value);
                    }
                }
            }

            if !open_a && !open_b {
                tracing::trace!("tee consumers dropped; stopping");
                return;
            }
        }
    });

    (out_a, out_b)
}

/// Send through a reserved slot. Returns whether the output is still open.
fn deliver<T: Clone>(
    permit: Result<mpsc::Permit<'_, T>, mpsc::error::SendError<()>>,
    value: &T,
) -> bool {
    match permit {
        Ok(permit) => {
            permit.send(value.clone());
            true
        }
        Err(_) => false,
    }
}
