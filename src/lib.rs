//! # service_messages
//!
//! Protocol-safe text for the line-oriented service messages a test runner
//! writes for a listening IDE (`##teamcity[testStarted name='...']`).
//!
//! ## What is in here?
//!
//! - **Attribute escaping**: reserved characters (line breaks, `|`, `'`, `[`,
//!   `]`) become `|` plus a one-character token, see [`escape`]
//! - **Delimited lists**: a sub-range of a string list joined with a single
//!   delimiter, backslash-escaping the delimiter and `\`, see [`join_list`]
//! - **String capability checks** for type-erased values, see [`is_string`]
//! - **Failure isolation**: [`Diagnostics`] runs reporter code, absorbs panics
//!   and errors, and reports them on stderr (falling back to stdout) instead
//!   of taking the host process down
//! - **Service messages**: [`ServiceMessage`] renders one protocol line with
//!   every attribute value escaped, and the [`service_message!`] macro builds one
//!
//! ## Quick Start
//!
//! ```rust
//! use service_messages::{escape, join_list, needs_escaping};
//!
//! assert_eq!(escape("expected [1]\ngot [2]"), "expected |[1|]|ngot |[2|]");
//! assert!(!needs_escaping("plain text"));
//!
//! let path = ["suite", "nested|case", r"C:\tmp"];
//! assert_eq!(join_list(&path, 0, 3, "|").unwrap(), r"suite|nested\|case|C:\\tmp");
//! ```
//!
//! ### Hardening a callback
//!
//! ```rust
//! use service_messages::{escape, Diagnostics};
//!
//! let diagnostics = Diagnostics::new();
//! let report = diagnostics
//!     .wrap(|name: &str| format!("##teamcity[testStarted name='{}']", escape(name)));
//!
//! assert_eq!(report("a'b").as_deref(), Some("##teamcity[testStarted name='a|'b']"));
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Escaping**: a single scan when nothing needs escaping, and no allocation;
//!   otherwise one more scan into a new buffer
//! - **Joining**: O(n) in the total length of the selected items
//! - **Escape table**: built once per process on first use, read-only afterwards
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Escaping and joining never fail because of string content
//! - Malformed arguments (multi-character delimiters, duplicate mappings,
//!   out-of-bounds ranges) are reported as [`Error`] values

pub mod classify;
pub mod error;
pub mod escape;
pub mod join;
pub mod macros;
pub mod map;
pub mod message;
pub mod options;
pub mod safe;

pub use classify::{as_str, is_string, is_string_primitive};
pub use error::{Error, Result};
pub use escape::AttributeEscaper;
pub use join::{join_list, ListJoiner};
pub use map::{EscapeMap, ATTRIBUTE_VALUE_MAPPINGS};
pub use message::ServiceMessage;
pub use options::{Delimiter, MessageOptions};
pub use safe::{
    safe_call, try_wrap, wrap, write_err, write_out, Channel, Diagnostics, Failure, Stderr,
    Stdout,
};

use std::borrow::Cow;

/// Escapes an attribute value with the shared attribute value table.
///
/// Returns the input borrowed when it contains no reserved character.
///
/// # Examples
///
/// ```rust
/// use service_messages::escape;
/// use std::borrow::Cow;
///
/// assert_eq!(escape("it's"), "it|'s");
/// assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
/// assert_eq!(escape(""), "");
/// ```
#[must_use]
pub fn escape(value: &str) -> Cow<'_, str> {
    AttributeEscaper::attribute_values().escape(value)
}

/// Returns `true` if [`escape`] would change `value`.
///
/// # Examples
///
/// ```rust
/// use service_messages::needs_escaping;
///
/// assert!(needs_escaping("line\nbreak"));
/// assert!(!needs_escaping(""));
/// ```
#[must_use]
pub fn needs_escaping(value: &str) -> bool {
    AttributeEscaper::attribute_values().needs_escaping(value)
}
