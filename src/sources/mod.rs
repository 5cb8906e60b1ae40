//! Source stages.
//!
//! Each source spawns one task that produces values until it runs out, its
//! token fires, or its consumer drops the returned stream.

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::processors::take;
use crate::stage::{send_or_cancel, spawn_stage, StageStream};

/// Emit `values` in order, then close.
///
/// # Examples
///
/// ```rust
/// use stageward::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let values = collect(generator(token, vec![1, 2, 3])).await;
/// assert_eq!(values, vec![1, 2, 3]);
/// # }
/// ```
pub fn generator<I>(token: CancellationToken, values: I) -> StageStream<I::Item>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    let values = values.into_iter();
    spawn_stage(|tx| async move {
        for value in values {
            if !send_or_cancel(&token, &tx, value).await {
                return;
            }
        }
    })
}

/// Cycle through `values` until the token fires.
///
/// An empty list has nothing to repeat and closes at once.
pub fn repeat<T>(token: CancellationToken, values: Vec<T>) -> StageStream<T>
where
    T: Clone + Send + 'static,
{
    spawn_stage(|tx| async move {
        if values.is_empty() {
            return;
        }
        loop {
            // `T` is not `Sync`: no borrow of `values` may live across the send.
            for i in 0..values.len() {
                let value = values[i].clone();
                if !send_or_cancel(&token, &tx, value).await {
                    return;
                }
            }
        }
    })
}

/// Call `f` once per element, forever.
pub fn repeat_func<T, F>(token: CancellationToken, mut f: F) -> StageStream<T>
where
    T: Send + 'static,
    F: FnMut() -> T + Send + 'static,
{
    spawn_stage(|tx| async move {
        loop {
            let value = f();
            if !send_or_cancel(&token, &tx, value).await {
                return;
            }
        }
    })
}

/// Call `f` with the same `args` once per element, forever.
pub fn repeat_func_with_args<T, A, F>(
    token: CancellationToken,
    mut f: F,
    args: Vec<A>,
) -> StageStream<T>
where
    T: Send + 'static,
    A: Send + 'static,
    F: FnMut(&[A]) -> T + Send + 'static,
{
    spawn_stage(|tx| async move {
        loop {
            let value = f(&args);
            if !send_or_cancel(&token, &tx, value).await {
                return;
            }
        }
    })
}

/// An endless stream of random integers in `[0, limit)`.
///
/// A `limit` of zero yields zeros.
pub fn random_below(token: CancellationToken, limit: u64) -> StageStream<u64> {
    repeat_func_with_args(
        token,
        |args: &[u64]| match args[0] {
            0 => 0,
            limit => rand::thread_rng().gen_range(0..limit),
        },
        vec![limit],
    )
}

/// At most `n` random integers in `[0, limit)`.
pub fn random_take(token: CancellationToken, n: usize, limit: u64) -> StageStream<u64> {
    take(token.clone(), random_below(token, limit), n)
}
