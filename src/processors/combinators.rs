//! Cancellation-aware passthrough and bounding stages.

use tokio_util::sync::CancellationToken;

use crate::stage::{recv_or_cancel, send_or_cancel, spawn_stage, StageStream};

/// Forward `input` until it closes or `token` fires.
///
/// Use this to read a stream whose producer does not watch the same token.
pub fn or_done<T>(token: CancellationToken, mut input: StageStream<T>) -> StageStream<T>
where
    T: Send + 'static,
{
    spawn_stage(|tx| async move {
        while let Some(value) = recv_or_cancel(&token, &mut input).await {
            if !send_or_cancel(&token, &tx, value).await {
                return;
            }
        }
    })
}

/// Emit at most the first `n` values of `input`.
///
/// The output closes after `n` values, or earlier if `input` closes or
/// `token` fires. This is how an infinite source is bounded.
pub fn take<T>(token: CancellationToken, mut input: StageStream<T>, n: usize) -> StageStream<T>
where
    T: Send + 'static,
{
    spawn_stage(|tx| async move {
        for _ in 0..n {
            let Some(value) = recv_or_cancel(&token, &mut input).await else {
                return;
            };
            if !send_or_cancel(&token, &tx, value).await {
                return;
            }
        }
    })
}
