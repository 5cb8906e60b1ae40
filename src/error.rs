//! Error types for stages and the steward.
//!
//! Cancellation is not represented here: a fired token simply closes the
//! affected streams. Ward liveness failures are not errors either; the steward
//! handles them by restarting the ward.

use std::any::Any;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// A type-erased stream element, as consumed by [`to_channel`](crate::processors::to_channel).
pub type Element = Box<dyn Any + Send + Sync>;

/// An element that could not be projected to the requested type.
///
/// The original element travels with the error so the caller can still use
/// it.
#[derive(Error)]
#[error("element is not of type `{expected}`")]
pub struct TypeMismatch {
    expected: &'static str,
    original: Element,
}

impl TypeMismatch {
    pub(crate) fn new(expected: &'static str, original: Element) -> Self {
        Self { expected, original }
    }

    /// Name of the type the element was expected to have.
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// Borrow the element that failed the projection.
    pub fn original(&self) -> &(dyn Any + Send + Sync) {
        self.original.as_ref()
    }

    /// Take back ownership of the element that failed the projection.
    pub fn into_original(self) -> Element {
        self.original
    }
}

impl fmt::Debug for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMismatch")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// The main error type of the crate.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// A stream element had the wrong dynamic type.
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),

    /// A steward was configured with a timeout it cannot monitor with.
    #[error("steward timeout must be greater than zero, got {timeout:?}")]
    InvalidTimeout {
        /// The rejected timeout.
        timeout: Duration,
    },
}

impl Error {
    /// Create an invalid timeout error
    pub fn invalid_timeout(timeout: Duration) -> Self {
        Error::InvalidTimeout { timeout }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::TypeMismatch(_) => "type_mismatch",
            Error::InvalidTimeout { .. } => "invalid_timeout",
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;
