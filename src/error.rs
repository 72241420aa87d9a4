//! Error types shared by every structure in the crate.

use thiserror::Error;

/// Result type alias using `StrataError`.
pub type StrataResult<T> = std::result::Result<T, StrataError>;

/// Errors raised by graph, tree and map operations.
///
/// All of them describe misuse by the caller. None is transient, so
/// nothing in the crate retries. A failing mutation leaves its structure
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// A stale or foreign node id, an out of range index, or an absent
    /// start node.
    #[error("InvalidArgument: {0}")]
    InvalidArgument(String),

    /// A required key or vertex is not present.
    #[error("NotFound: {0}")]
    NotFound(String),

    /// A strict insertion would break a uniqueness invariant.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl StrataError {
    /// Create a new `InvalidArgument` error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new `NotFound` error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new `Conflict` error.
    pub fn conflict<S: Into<String>>(msg: S) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Return early with an error unless the condition holds.
///
/// ```ignore
/// ensure!(index <= len, InvalidArgument: "index {} out of range", index);
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::StrataError::$variant(format!($($msg)*)));
        }
    };
}
