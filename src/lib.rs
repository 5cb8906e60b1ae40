//! # Cancellable stream stages and a heartbeat steward
//!
//! This crate provides small, composable stream stages that each run on their
//! own tokio task, plus a [`Steward`](steward::Steward) that supervises a
//! long-running worker through its heartbeat and restarts it when it goes
//! quiet.
//!
//! ## Core Concepts
//!
//! - **Token**: a [`CancellationToken`] shared by every stage of a pipeline;
//!   cancelling it closes every stage output
//! - **Stage stream**: the [`StageStream`](stage::StageStream) a stage returns,
//!   closed exactly once by the stage
//! - **Sources**: [`generator`](sources::generator), [`repeat`](sources::repeat),
//!   [`repeat_func`](sources::repeat_func), [`repeat_func_with_args`](sources::repeat_func_with_args)
//! - **Processors**: [`apply_function`](processors::apply_function),
//!   [`to_channel`](processors::to_channel), [`tee`](processors::tee),
//!   [`or_done`](processors::or_done), [`take`](processors::take)
//! - **Steward**: restarts a [`Ward`](steward::Ward) whose heartbeat times out
//!
//! ## Example
//!
//! ```rust
//! use stageward::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let token = CancellationToken::new();
//!
//!     let xs = take(token.clone(), repeat(token.clone(), vec!["x"]), 5);
//!     assert_eq!(collect(xs).await, vec!["x"; 5]);
//!
//!     let numbers = generator(token.clone(), vec![1, 2, 3]);
//!     let (left, right) = tee(token.clone(), apply_function(token.clone(), numbers, 10, |a, b| a + b));
//!     let (left, right) = tokio::join!(collect(left), collect(right));
//!     assert_eq!(left, vec![11, 12, 13]);
//!     assert_eq!(right, vec![11, 12, 13]);
//!
//!     token.cancel();
//! }
//! ```

pub mod config;
pub mod error;
pub mod processors;
pub mod sources;
pub mod stage;
pub mod steward;
pub mod util;

pub use tokio_util::sync::CancellationToken;

// Re-export commonly used items
pub mod prelude {
    pub use crate::config::StewardConfig;
    pub use crate::error::{Element, Error, Result, TypeMismatch};
    pub use crate::processors::{apply_function, or_done, take, tee, to_channel};
    pub use crate::sources::{
        generator, random_below, random_take, repeat, repeat_func, repeat_func_with_args,
    };
    pub use crate::stage::{heartbeat, try_pulse, Heartbeat, PulseOutcome, StageStream};
    pub use crate::steward::{new_steward, ward_fn, Steward, Ward};
    pub use crate::util::{collect, collect_n};
    pub use tokio_util::sync::CancellationToken;
}

// Re-export main error type
pub use error::{Error, Result};
