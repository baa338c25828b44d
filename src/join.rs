//! Delimited list joining.
//!
//! Serializes a sub-range of a string list into one string. Items are separated
//! by a single delimiter character; occurrences of the delimiter or of `\`
//! inside an item are preceded by `\`, so a consumer can split on unescaped
//! delimiters and strip single backslash escapes.
//!
//! This uses backslash escaping and is unrelated to attribute escaping. The two
//! must not be applied to the same string in place of one another.
//!
//! ## Examples
//!
//! ```rust
//! use service_messages::join_list;
//!
//! assert_eq!(join_list(&["a|b", "c"], 0, 2, "|").unwrap(), r"a\|b|c");
//! assert_eq!(join_list(&["x", "y", "z"], 1, 3, ",").unwrap(), "y,z");
//! ```

use crate::map::single_char;
use crate::{Delimiter, Error, Result};
use std::str::FromStr;

const ESCAPE_CHAR: char = '\\';

/// Joins string lists with a fixed single-character delimiter.
///
/// # Examples
///
/// ```rust
/// use service_messages::{Delimiter, ListJoiner};
///
/// let joiner = ListJoiner::new(Delimiter::Comma);
/// assert_eq!(joiner.join_all(&["a,b", r"c\d"]), r"a\,b,c\\d");
///
/// let joiner: ListJoiner = "/".parse().unwrap();
/// assert_eq!(joiner.join_all(&["src", "lib.rs"]), "src/lib.rs");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListJoiner {
    delimiter: char,
}

impl ListJoiner {
    /// Joiner separating items with `delimiter`.
    #[must_use]
    pub fn new(delimiter: Delimiter) -> Self {
        ListJoiner {
            delimiter: delimiter.as_char(),
        }
    }

    #[must_use]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Joins `items[from..to]`.
    ///
    /// An empty list yields `""` without looking at the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if the list is non-empty and the bounds
    /// do not satisfy `from <= to <= items.len()`.
    pub fn join<S: AsRef<str>>(&self, items: &[S], from: usize, to: usize) -> Result<String> {
        if items.is_empty() {
            return Ok(String::new());
        }
        if from > to || to > items.len() {
            return Err(Error::InvalidRange {
                from,
                to,
                len: items.len(),
            });
        }
        let mut output = String::new();
        self.join_into(&items[from..to], &mut output);
        Ok(output)
    }

    /// Joins every item of `items`.
    #[must_use]
    pub fn join_all<S: AsRef<str>>(&self, items: &[S]) -> String {
        let mut output = String::new();
        self.join_into(items, &mut output);
        output
    }

    /// Appends the joined form of `items` to `output`.
    pub fn join_into<S: AsRef<str>>(&self, items: &[S], output: &mut String) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                output.push(self.delimiter);
            }
            for ch in item.as_ref().chars() {
                if ch == self.delimiter || ch == ESCAPE_CHAR {
                    output.push(ESCAPE_CHAR);
                }
                output.push(ch);
            }
        }
    }
}

impl Default for ListJoiner {
    fn default() -> Self {
        ListJoiner::new(Delimiter::default())
    }
}

impl From<Delimiter> for ListJoiner {
    fn from(delimiter: Delimiter) -> Self {
        ListJoiner::new(delimiter)
    }
}

impl FromStr for ListJoiner {
    type Err = Error;

    /// Parses a delimiter given as a string, which must be exactly one character.
    fn from_str(s: &str) -> Result<Self> {
        single_char(s)
            .map(|ch| ListJoiner::new(Delimiter::from(ch)))
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "Delimiter is expected to be a character, but {s:?} received"
                ))
            })
    }
}

/// Joins `items[from..to]` with `delimiter`, escaping the delimiter and `\` inside items.
///
/// An empty list yields `""` before the delimiter or the bounds are checked.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `delimiter` is not exactly one
/// character, and [`Error::InvalidRange`] for bounds outside the list.
pub fn join_list<S: AsRef<str>>(
    items: &[S],
    from: usize,
    to: usize,
    delimiter: &str,
) -> Result<String> {
    if items.is_empty() {
        return Ok(String::new());
    }
    delimiter.parse::<ListJoiner>()?.join(items, from, to)
}
