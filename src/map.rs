//! Character substitution table used by the attribute escaper.
//!
//! [`EscapeMap`] is a wrapper around [`IndexMap`] from a reserved character to
//! the single-character token written after the `|` marker. Insertion order is
//! kept so that iteration (and therefore debug output) is deterministic.
//!
//! The table for service message attribute values is built exactly once per
//! process and shared read-only afterwards, see [`EscapeMap::attribute_values`].
//!
//! ## Examples
//!
//! ```rust
//! use service_messages::EscapeMap;
//!
//! let map = EscapeMap::attribute_values();
//! assert_eq!(map.lookup('\n'), Some('n'));
//! assert_eq!(map.lookup('a'), None);
//! ```

use crate::{Error, Result};
use indexmap::IndexMap;
use std::sync::OnceLock;

/// Reserved characters of the service message attribute format and their tokens.
pub const ATTRIBUTE_VALUE_MAPPINGS: [(char, char); 9] = [
    ('\n', 'n'),
    ('\r', 'r'),
    ('\u{0085}', 'x'),
    ('\u{2028}', 'l'),
    ('\u{2029}', 'p'),
    ('|', '|'),
    ('\'', '\''),
    ('[', '['),
    (']', ']'),
];

static ATTRIBUTE_VALUES: OnceLock<EscapeMap> = OnceLock::new();

/// An immutable-after-construction mapping from a reserved character to its token.
///
/// Every source character maps to exactly one token. Registering the same source
/// character twice is rejected with [`Error::DuplicateMapping`].
///
/// # Examples
///
/// ```rust
/// use service_messages::{EscapeMap, Error};
///
/// let mut map = EscapeMap::new();
/// map.register("\t", "t").unwrap();
///
/// assert_eq!(map.lookup('\t'), Some('t'));
/// assert!(matches!(map.register("\t", "T"), Err(Error::DuplicateMapping { .. })));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeMap(IndexMap<char, char>);

impl EscapeMap {
    /// Creates an empty `EscapeMap`.
    #[must_use]
    pub fn new() -> Self {
        EscapeMap(IndexMap::new())
    }

    /// Builds a map from `(reserved, token)` pairs, failing on the first duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateMapping`] if a reserved character appears twice.
    pub fn from_pairs(pairs: &[(char, char)]) -> Result<Self> {
        let mut map = EscapeMap(IndexMap::with_capacity(pairs.len()));
        for &(from, to) in pairs {
            map.register_char(from, to)?;
        }
        Ok(map)
    }

    /// The process-wide table for attribute values, built on first use.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use service_messages::EscapeMap;
    ///
    /// let map = EscapeMap::attribute_values();
    /// assert_eq!(map.len(), 9);
    /// assert_eq!(map.lookup('\u{2028}'), Some('l'));
    /// ```
    #[must_use]
    pub fn attribute_values() -> &'static EscapeMap {
        ATTRIBUTE_VALUES.get_or_init(|| {
            log::trace!(
                "building attribute value escape table ({} entries)",
                ATTRIBUTE_VALUE_MAPPINGS.len()
            );
            EscapeMap::from_pairs(&ATTRIBUTE_VALUE_MAPPINGS)
                .expect("attribute value mappings contain no duplicates")
        })
    }

    /// Registers a mapping given as two strings, each of which must be one character.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either string is not exactly one
    /// character long, and [`Error::DuplicateMapping`] if `from` is already mapped.
    pub fn register(&mut self, from: &str, to: &str) -> Result<&mut Self> {
        let (from, to) = match (single_char(from), single_char(to)) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                return Err(Error::invalid_argument(format!(
                    "String length should be 1, got {from:?} -> {to:?}"
                )))
            }
        };
        self.register_char(from, to)
    }

    /// Registers a mapping from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateMapping`] if `from` is already mapped.
    pub fn register_char(&mut self, from: char, to: char) -> Result<&mut Self> {
        if let Some(&existing) = self.0.get(&from) {
            return Err(Error::DuplicateMapping { from, existing });
        }
        self.0.insert(from, to);
        Ok(self)
    }

    /// Returns the token for `ch`, or `None` if `ch` is not reserved.
    #[inline]
    #[must_use]
    pub fn lookup(&self, ch: char) -> Option<char> {
        self.0.get(&ch).copied()
    }

    /// Returns `true` if `ch` has a mapping.
    #[inline]
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.0.contains_key(&ch)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over `(reserved, token)` pairs, in registration order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, char, char> {
        self.0.iter()
    }
}

impl Default for EscapeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a EscapeMap {
    type Item = (&'a char, &'a char);
    type IntoIter = indexmap::map::Iter<'a, char, char>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Returns the only character of `s`, or `None` if `s` is empty or longer.
pub(crate) fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}
