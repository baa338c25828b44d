//! Error types for escaping, joining and message construction.
//!
//! Escaping itself is total and never fails. Everything that can fail here is a
//! programming error on the caller's side (a malformed mapping, a delimiter that
//! is not a single character, an out-of-bounds range) or an I/O failure while
//! writing to an output channel.
//!
//! ## Examples
//!
//! ```rust
//! use service_messages::{join_list, Error};
//!
//! let result = join_list(&["a", "b"], 0, 2, "::");
//! assert!(matches!(result, Err(Error::InvalidArgument(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument that must be exactly one character was not.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A second mapping was registered for an already mapped character.
    #[error("Duplicate mapping for {from:?}: already mapped to {existing:?}")]
    DuplicateMapping { from: char, existing: char },

    /// A sub-range does not satisfy `from <= to <= len`.
    #[error("Invalid range {from}..{to} for a list of length {len}")]
    InvalidRange { from: usize, to: usize, len: usize },

    /// IO error while writing to an output channel
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates an invalid argument error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use service_messages::Error;
    ///
    /// let err = Error::invalid_argument("String length should be 1");
    /// assert!(err.to_string().contains("length should be 1"));
    /// ```
    pub fn invalid_argument<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidArgument(msg.to_string())
    }

    /// Creates an I/O error for channel write failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
