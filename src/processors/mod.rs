//! Transform stages.
//!
//! Processors read one [`StageStream`] and produce another. They stop when
//! their input closes, their token fires, or their consumer goes away.

pub mod combinators;
pub mod fanout;

use std::any::type_name;

use tokio_util::sync::CancellationToken;

use crate::error::{Element, TypeMismatch};
use crate::stage::{recv_or_cancel, send_or_cancel, spawn_stage, StageStream};

pub use combinators::{or_done, take};
pub use fanout::tee;

/// Emit `combine(x, value)` for every `x` read from `input`.
///
/// # Examples
///
/// ```rust
/// use stageward::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let numbers = generator(token.clone(), vec![1, 2, 3]);
/// let shifted = apply_function(token, numbers, 10, |x, y| x + y);
/// assert_eq!(collect(shifted).await, vec![11, 12, 13]);
/// # }
/// ```
pub fn apply_function<T, F>(
    token: CancellationToken,
    mut input: StageStream<T>,
    value: T,
    mut combine: F,
) -> StageStream<T>
where
    T: Clone + Send + 'static,
    F: FnMut(T, T) -> T + Send + 'static,
{
    spawn_stage(|tx| async move {
        while let Some(x) = recv_or_cancel(&token, &mut input).await {
            let combined = combine(x, value.clone());
            if !send_or_cancel(&token, &tx, combined).await {
                return;
            }
        }
    })
}

/// Project type-erased elements to `T`.
///
/// Elements of another type are emitted as [`TypeMismatch`] errors carrying
/// the original element; the stage keeps running after a mismatch.
pub fn to_channel<T>(
    token: CancellationToken,
    mut input: StageStream<Element>,
) -> StageStream<Result<T, TypeMismatch>>
where
    T: Send + 'static,
{
    spawn_stage(|tx| async move {
        while let Some(element) = recv_or_cancel(&token, &mut input).await {
            let projected = element
                .downcast::<T>()
                .map(|boxed| *boxed)
                .map_err(|original| TypeMismatch::new(type_name::<T>(), original));
            if !send_or_cancel(&token, &tx, projected).await {
                return;
            }
        }
    })
}
