//! Configuration options for list joining and message rendering.
//!
//! - [`Delimiter`]: the single character separating items of a delimited list
//! - [`MessageOptions`]: how a [`ServiceMessage`](crate::ServiceMessage) is rendered
//!
//! ## Examples
//!
//! ```rust
//! use service_messages::{Delimiter, MessageOptions};
//!
//! let options = MessageOptions::new().with_timestamps(true);
//! assert!(options.timestamps);
//! assert_eq!(Delimiter::Pipe.as_char(), '|');
//! ```

/// Delimiter for joined lists.
///
/// # Examples
///
/// ```rust
/// use service_messages::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_char(), ',');
/// assert_eq!(Delimiter::Pipe.as_char(), '|');
/// assert_eq!(Delimiter::Char('/').as_char(), '/');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Pipe,
    Semicolon,
    Char(char),
}

impl Delimiter {
    /// Returns the character this delimiter stands for.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
            Delimiter::Char(ch) => *ch,
        }
    }
}

impl From<char> for Delimiter {
    fn from(ch: char) -> Self {
        match ch {
            ',' => Delimiter::Comma,
            '|' => Delimiter::Pipe,
            ';' => Delimiter::Semicolon,
            other => Delimiter::Char(other),
        }
    }
}

/// Default line marker understood by IDE consumers.
pub const DEFAULT_MARKER: &str = "##teamcity";

/// Rendering options for service messages.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageOptions {
    /// Text written before the opening `[`.
    pub marker: String,
    /// Whether rendered messages get a `timestamp` attribute.
    pub timestamps: bool,
}

impl Default for MessageOptions {
    fn default() -> Self {
        MessageOptions {
            marker: DEFAULT_MARKER.to_string(),
            timestamps: false,
        }
    }
}

impl MessageOptions {
    /// Creates default options (`##teamcity` marker, no timestamps).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use service_messages::MessageOptions;
    ///
    /// let options = MessageOptions::new();
    /// assert_eq!(options.marker, "##teamcity");
    /// assert!(!options.timestamps);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Enables or disables the `timestamp` attribute.
    #[must_use]
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }
}
