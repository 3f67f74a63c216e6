//! Error types for PST encoding.
//!
//! Decoding never fails: malformed input degrades to the closest value. The
//! only failures come from turning an arbitrary Rust value into the PST model.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while converting a value into PST.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PstError {
    /// The value has no PST representation (non-string map key, integer
    /// outside the `i64` range, ...).
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// A message raised by a `Serialize` implementation.
    #[error("{0}")]
    Custom(String),
}

impl PstError {
    pub(crate) fn unsupported(what: impl fmt::Display) -> Self {
        PstError::UnsupportedValueType(what.to_string())
    }
}

impl serde::ser::Error for PstError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        PstError::Custom(msg.to_string())
    }
}

/// Convenience alias used throughout pst-core.
pub type Result<T> = std::result::Result<T, PstError>;
