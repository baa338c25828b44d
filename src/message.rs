//! Service messages.
//!
//! A service message is one line of the form
//!
//! ```text
//! ##teamcity[testFailed name='adds numbers' message='expected |'2|']
//! ```
//!
//! or, in the single-value form, `##teamcity[progressMessage 'building']`.
//! Every attribute value goes through the attribute escaper when the line is
//! rendered; names are written as given.
//!
//! ## Examples
//!
//! ```rust
//! use service_messages::ServiceMessage;
//!
//! let message = ServiceMessage::new("testStarted")
//!     .attr("name", "it's fine")
//!     .attr("nodeId", "3");
//! assert_eq!(
//!     message.to_string(),
//!     "##teamcity[testStarted name='it|'s fine' nodeId='3']"
//! );
//! ```

use crate::safe::Channel;
use crate::{AttributeEscaper, MessageOptions, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;

/// Format of the `timestamp` attribute, e.g. `2024-01-15T10:30:00.000+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

#[derive(Debug, Clone, PartialEq)]
enum Body {
    Attributes(IndexMap<String, String>),
    Single(String),
}

/// One service message line.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceMessage {
    name: String,
    body: Body,
    timestamp: Option<DateTime<Utc>>,
    options: MessageOptions,
}

impl ServiceMessage {
    /// Creates a message with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        ServiceMessage {
            name: name.into(),
            body: Body::Attributes(IndexMap::new()),
            timestamp: None,
            options: MessageOptions::default(),
        }
    }

    /// Creates a single-value message: `##teamcity[name 'value']`.
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        ServiceMessage {
            body: Body::Single(value.into()),
            ..ServiceMessage::new(name)
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: MessageOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the time written in the `timestamp` attribute.
    ///
    /// Rendering only includes it when timestamps are enabled in the options;
    /// with timestamps enabled and no time set, the current time is used.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Adds or replaces an attribute, keeping first-insertion order.
    ///
    /// On a single-value message this turns it into an attribute message.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces an attribute in place, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        if let Body::Single(_) = self.body {
            self.body = Body::Attributes(IndexMap::new());
        }
        match &mut self.body {
            Body::Attributes(attributes) => attributes.insert(key.into(), value.into()),
            Body::Single(_) => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn options(&self) -> &MessageOptions {
        &self.options
    }

    /// Returns the raw, unescaped value of an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match &self.body {
            Body::Attributes(attributes) => attributes.get(key).map(String::as_str),
            Body::Single(_) => None,
        }
    }

    /// Returns the raw value of a single-value message.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match &self.body {
            Body::Single(value) => Some(value),
            Body::Attributes(_) => None,
        }
    }

    /// Number of attributes, not counting `timestamp`.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.body {
            Body::Attributes(attributes) => attributes.len(),
            Body::Single(_) => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the message, followed by a newline, onto `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the channel rejects the write.
    pub fn emit<C: Channel>(&self, channel: &C) -> Result<()> {
        let mut line = self.to_string();
        line.push('\n');
        channel.write_text(&line)?;
        Ok(())
    }

    fn write_quoted(output: &mut String, escaper: &AttributeEscaper<'_>, value: &str) {
        output.push('\'');
        escaper.escape_into(value, output);
        output.push('\'');
    }
}

impl fmt::Display for ServiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escaper = AttributeEscaper::attribute_values();
        let mut output = String::with_capacity(64);
        output.push_str(&self.options.marker);
        output.push('[');
        output.push_str(&self.name);

        match &self.body {
            Body::Single(value) => {
                output.push(' ');
                Self::write_quoted(&mut output, &escaper, value);
            }
            Body::Attributes(attributes) => {
                for (key, value) in attributes {
                    output.push(' ');
                    output.push_str(key);
                    output.push('=');
                    Self::write_quoted(&mut output, &escaper, value);
                }
                if self.options.timestamps && !attributes.contains_key("timestamp") {
                    let timestamp = self.timestamp.unwrap_or_else(Utc::now);
                    output.push_str(" timestamp=");
                    let formatted = timestamp.format(TIMESTAMP_FORMAT).to_string();
                    Self::write_quoted(&mut output, &escaper, &formatted);
                }
            }
        }

        output.push(']');
        f.write_str(&output)
    }
}
