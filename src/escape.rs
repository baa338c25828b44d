//! Attribute value escaping.
//!
//! Service message attribute values are written between single quotes on a
//! single line, so line breaks, the quote itself, the square brackets that
//! delimit the message and the `|` escape marker must never appear raw. Each of
//! them is replaced by `|` followed by the token from the [`EscapeMap`]:
//!
//! | reserved | written as |
//! |----------|------------|
//! | `\n` | `\|n` |
//! | `\r` | `\|r` |
//! | `U+0085` | `\|x` |
//! | `U+2028` | `\|l` |
//! | `U+2029` | `\|p` |
//! | `\|` | `\|\|` |
//! | `'` | `\|'` |
//! | `[` | `\|[` |
//! | `]` | `\|]` |
//!
//! Escaping is not idempotent: the `|` introduced by one pass is itself escaped
//! by the next.

use crate::EscapeMap;
use std::borrow::Cow;

/// Escapes attribute values with a borrowed [`EscapeMap`].
///
/// # Examples
///
/// ```rust
/// use service_messages::{AttributeEscaper, EscapeMap};
///
/// let escaper = AttributeEscaper::new(EscapeMap::attribute_values());
/// assert_eq!(escaper.escape("it's [ok]"), "it|'s |[ok|]");
/// assert!(!escaper.needs_escaping("plain"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AttributeEscaper<'m> {
    map: &'m EscapeMap,
}

impl<'m> AttributeEscaper<'m> {
    /// Escaper over a caller-built `map`, borrowed for the escaper's lifetime.
    #[must_use]
    pub fn new(map: &'m EscapeMap) -> Self {
        AttributeEscaper { map }
    }

    /// Escaper over the shared attribute value table.
    #[must_use]
    pub fn attribute_values() -> AttributeEscaper<'static> {
        AttributeEscaper::new(EscapeMap::attribute_values())
    }

    /// Returns `true` as soon as a reserved character is found.
    #[inline]
    #[must_use]
    pub fn needs_escaping(&self, s: &str) -> bool {
        s.chars().any(|ch| self.map.contains(ch))
    }

    /// Escapes `s`, borrowing it unchanged when nothing is reserved.
    #[must_use]
    pub fn escape<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if !self.needs_escaping(s) {
            return Cow::Borrowed(s);
        }
        // Every reserved character grows by one, a small headroom covers the common case
        let mut output = String::with_capacity(s.len() + 8);
        self.push_escaped(s, &mut output);
        Cow::Owned(output)
    }

    /// Appends the escaped form of `s` to `output`.
    pub fn escape_into(&self, s: &str, output: &mut String) {
        if self.needs_escaping(s) {
            self.push_escaped(s, output);
        } else {
            output.push_str(s);
        }
    }

    fn push_escaped(&self, s: &str, output: &mut String) {
        for ch in s.chars() {
            match self.map.lookup(ch) {
                Some(token) => {
                    output.push('|');
                    output.push(token);
                }
                None => output.push(ch),
            }
        }
    }
}

impl Default for AttributeEscaper<'static> {
    fn default() -> Self {
        AttributeEscaper::attribute_values()
    }
}
