//! Failure isolation and best-effort diagnostics.
//!
//! Reporter code runs inside someone else's process (a test framework calling
//! back into us), so a bug in message formatting must never take the host down.
//! [`Diagnostics`] runs a closure, absorbs any panic or error it produces,
//! reports it as one `warn` line and hands back `None` instead.
//!
//! Diagnostics are written to a primary channel (stderr by default). If that
//! write fails, the secondary channel (stdout by default) is tried once; if
//! that fails too, the line is dropped.
//!
//! ## Examples
//!
//! ```rust
//! use service_messages::Diagnostics;
//!
//! let diagnostics = Diagnostics::new();
//!
//! assert_eq!(diagnostics.call(|| 40 + 2), Some(42));
//!
//! let parse = diagnostics.wrap(|s: &str| s.parse::<u32>().expect("a number"));
//! assert_eq!(parse("7"), Some(7));
//! assert_eq!(parse("seven"), None); // reported on stderr, not propagated
//! ```

use crate::Result;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

/// Default label written in front of every diagnostic line.
pub const DEFAULT_PREFIX: &str = "warn service-messages: ";

/// A destination for text that may fail to accept it.
pub trait Channel {
    fn write_text(&self, text: &str) -> io::Result<()>;
}

/// The process standard output, written without buffering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

/// The process standard error, written without buffering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stderr;

impl Channel for Stdout {
    fn write_text(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

impl Channel for Stderr {
    fn write_text(&self, text: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        err.write_all(text.as_bytes())?;
        err.flush()
    }
}

impl<F> Channel for F
where
    F: Fn(&str) -> io::Result<()>,
{
    fn write_text(&self, text: &str) -> io::Result<()> {
        self(text)
    }
}

/// Writes `text` to standard output.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the write fails.
pub fn write_out(text: &str) -> Result<()> {
    Stdout.write_text(text)?;
    Ok(())
}

/// Writes `text` to standard error.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the write fails.
pub fn write_err(text: &str) -> Result<()> {
    Stderr.write_text(text)?;
    Ok(())
}

/// A failure caught by [`Diagnostics`], ready to be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub trace: String,
}

impl Failure {
    pub fn new(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Failure {
            message: message.into(),
            trace: trace.into(),
        }
    }

    /// Describes a panic from its payload. Only `&str` and `String` payloads carry text.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "<non-string panic payload>".to_string()
        };
        Failure::new(message, String::new())
    }

    /// Describes an error; its `source()` chain becomes the trace.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        let mut trace = String::new();
        let mut source = err.source();
        while let Some(cause) = source {
            if !trace.is_empty() {
                trace.push('\n');
            }
            trace.push_str("caused by: ");
            trace.push_str(&cause.to_string());
            source = cause.source();
        }
        Failure::new(err.to_string(), trace)
    }

    /// The text reported for this failure.
    ///
    /// A trace that already contains the message is used alone, otherwise the
    /// message comes first and the trace follows on the next line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use service_messages::Failure;
    ///
    /// let failure = Failure::new("boom", "Error: boom\n    at run");
    /// assert_eq!(failure.report(), "Error: boom\n    at run");
    ///
    /// let failure = Failure::new("boom", "    at run");
    /// assert_eq!(failure.report(), "boom\n    at run");
    /// ```
    #[must_use]
    pub fn report(&self) -> String {
        if self.trace.contains(self.message.as_str()) {
            self.trace.clone()
        } else if self.trace.is_empty() {
            self.message.clone()
        } else {
            format!("{}\n{}", self.message, self.trace)
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

/// Best-effort diagnostic sink and failure-isolating call wrapper.
///
/// `P` is the primary channel and `S` the fallback; both default to the process
/// standard streams.
///
/// A caught panic is reported with its payload text only. Its location and
/// backtrace come from the process panic hook, which writes straight to stderr
/// before the panic reaches [`call`](Self::call): that output carries no prefix
/// and does not fall back to the secondary channel. Install a quiet hook with
/// [`std::panic::set_hook`] if only the diagnostic line should appear.
#[derive(Debug, Clone)]
pub struct Diagnostics<P = Stderr, S = Stdout> {
    prefix: Cow<'static, str>,
    primary: P,
    secondary: S,
}

impl Diagnostics {
    /// Diagnostics writing to stderr, falling back to stdout.
    #[must_use]
    pub fn new() -> Self {
        Diagnostics::with_channels(Stderr, Stdout)
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Channel, S: Channel> Diagnostics<P, S> {
    pub fn with_channels(primary: P, secondary: S) -> Self {
        Diagnostics {
            prefix: Cow::Borrowed(DEFAULT_PREFIX),
            primary,
            secondary,
        }
    }

    /// Replaces the label written in front of every diagnostic line.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Writes one diagnostic line. Never fails and never panics on write errors.
    pub fn warn(&self, message: &str) {
        self.warn_fmt(format_args!("{message}"));
    }

    pub fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        let line = format!("{}{}\n", self.prefix, args);
        if let Err(primary_err) = self.primary.write_text(&line) {
            log::debug!("primary diagnostic channel failed: {primary_err}");
            if let Err(secondary_err) = self.secondary.write_text(&line) {
                log::debug!(
                    "secondary diagnostic channel failed, dropping line: {secondary_err}"
                );
            }
        }
    }

    /// Reports `failure` as a diagnostic line.
    pub fn report(&self, failure: &Failure) {
        log::debug!("absorbed failure: {}", failure.message);
        self.warn(&failure.report());
    }

    /// Runs `f`, returning `None` and reporting instead of unwinding if it panics.
    pub fn call<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce() -> R,
    {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Some(value),
            Err(payload) => {
                self.report(&Failure::from_panic(payload.as_ref()));
                None
            }
        }
    }

    /// Like [`call`](Self::call), but an `Err` returned by `f` is reported as well.
    pub fn try_call<R, E, F>(&self, f: F) -> Option<R>
    where
        E: std::error::Error,
        F: FnOnce() -> std::result::Result<R, E>,
    {
        match self.call(f)? {
            Ok(value) => Some(value),
            Err(err) => {
                self.report(&Failure::from_error(&err));
                None
            }
        }
    }

    /// Wraps `f` so that every call goes through [`call`](Self::call).
    ///
    /// Functions of several arguments take them as a tuple.
    pub fn wrap<'a, A, R, F>(&'a self, f: F) -> impl Fn(A) -> Option<R> + 'a
    where
        F: Fn(A) -> R + 'a,
        A: 'a,
        R: 'a,
    {
        move |args| self.call(|| f(args))
    }

    /// Wraps a fallible `f` so that every call goes through [`try_call`](Self::try_call).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use service_messages::{join_list, Diagnostics};
    ///
    /// let diagnostics = Diagnostics::new();
    /// let join = diagnostics.try_wrap(|delim: &str| join_list(&["a", "b"], 0, 2, delim));
    ///
    /// assert_eq!(join("|").as_deref(), Some("a|b"));
    /// assert_eq!(join("::"), None); // reported on stderr, not propagated
    /// ```
    pub fn try_wrap<'a, A, R, E, F>(&'a self, f: F) -> impl Fn(A) -> Option<R> + 'a
    where
        E: std::error::Error,
        F: Fn(A) -> std::result::Result<R, E> + 'a,
        A: 'a,
        R: 'a,
        E: 'a,
    {
        move |args| self.try_call(|| f(args))
    }
}

/// Wraps `f` with a default [`Diagnostics`] (stderr, then stdout).
///
/// # Examples
///
/// ```rust
/// let add = service_messages::wrap(|(a, b): (i32, i32)| a + b);
/// assert_eq!(add((40, 2)), Some(42));
/// ```
pub fn wrap<A, R, F>(f: F) -> impl Fn(A) -> Option<R>
where
    F: Fn(A) -> R,
{
    let diagnostics = Diagnostics::new();
    move |args| diagnostics.call(|| f(args))
}

/// Wraps a fallible `f` with a default [`Diagnostics`], reporting both panics and `Err`s.
pub fn try_wrap<A, R, E, F>(f: F) -> impl Fn(A) -> Option<R>
where
    E: std::error::Error,
    F: Fn(A) -> std::result::Result<R, E>,
{
    let diagnostics = Diagnostics::new();
    move |args| diagnostics.try_call(|| f(args))
}

/// Runs `f` once with a default [`Diagnostics`].
pub fn safe_call<R, F>(f: F) -> Option<R>
where
    F: FnOnce() -> R,
{
    Diagnostics::new().call(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Capture(Rc<RefCell<String>>);

    impl Capture {
        fn text(&self) -> String {
            self.0.borrow().clone()
        }
    }

    impl Channel for Capture {
        fn write_text(&self, text: &str) -> io::Result<()> {
            self.0.borrow_mut().push_str(text);
            Ok(())
        }
    }

    struct Broken;

    impl Channel for Broken {
        fn write_text(&self, _text: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("could not render message")]
    struct RenderError {
        #[source]
        source: io::Error,
    }

    #[test]
    fn test_warn_writes_prefixed_line_to_primary() {
        let primary = Capture::default();
        let secondary = Capture::default();
        let diagnostics = Diagnostics::with_channels(primary.clone(), secondary.clone());

        diagnostics.warn("hello");

        assert_eq!(primary.text(), "warn service-messages: hello\n");
        assert_eq!(secondary.text(), "");
    }

    #[test]
    fn test_warn_falls_back_to_secondary() {
        let secondary = Capture::default();
        let diagnostics = Diagnostics::with_channels(Broken, secondary.clone());

        diagnostics.warn_fmt(format_args!("{} failed", "suite"));

        assert_eq!(secondary.text(), "warn service-messages: suite failed\n");
    }

    #[test]
    fn test_warn_swallows_double_failure() {
        let diagnostics = Diagnostics::with_channels(Broken, Broken);
        diagnostics.warn("nobody hears this");
    }

    #[test]
    fn test_closure_channel_and_custom_prefix() {
        let seen = RefCell::new(Vec::new());
        let primary = |text: &str| -> io::Result<()> {
            seen.borrow_mut().push(text.to_string());
            Ok(())
        };
        let diagnostics = Diagnostics::with_channels(primary, Broken).with_prefix("warn mocha: ");

        diagnostics.warn("x");

        assert_eq!(diagnostics.prefix(), "warn mocha: ");
        assert_eq!(seen.borrow().as_slice(), ["warn mocha: x\n".to_string()]);
    }

    #[test]
    fn test_call_passes_value_through() {
        let primary = Capture::default();
        let diagnostics = Diagnostics::with_channels(primary.clone(), Broken);

        assert_eq!(diagnostics.call(|| 42), Some(42));
        assert_eq!(primary.text(), "");
    }

    #[test]
    fn test_call_absorbs_panic() {
        let primary = Capture::default();
        let diagnostics = Diagnostics::with_channels(primary.clone(), Broken);

        let result: Option<()> = diagnostics.call(|| panic!("boom"));

        assert_eq!(result, None);
        assert!(primary.text().contains("boom"));
        assert!(primary.text().starts_with(DEFAULT_PREFIX));
    }

    #[test]
    fn test_call_absorbs_formatted_panic() {
        let primary = Capture::default();
        let diagnostics = Diagnostics::with_channels(primary.clone(), Broken);
        let id = 7;

        let result: Option<u8> = diagnostics.call(|| panic!("bad node {id}"));

        assert_eq!(result, None);
        assert!(primary.text().contains("bad node 7"));
    }

    #[test]
    fn test_try_call_reports_error_chain() {
        let primary = Capture::default();
        let diagnostics = Diagnostics::with_channels(primary.clone(), Broken);

        let result: Option<()> = diagnostics.try_call(|| {
            Err(RenderError {
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            })
        });

        assert_eq!(result, None);
        assert_eq!(
            primary.text(),
            "warn service-messages: could not render message\ncaused by: disk full\n"
        );
    }

    #[test]
    fn test_try_call_ok() {
        let diagnostics = Diagnostics::with_channels(Capture::default(), Broken);
        let result = diagnostics.try_call(|| "5".parse::<i32>());
        assert_eq!(result, Some(5));
    }

    #[test]
    fn test_wrap_keeps_working_after_failure() {
        let primary = Capture::default();
        let diagnostics = Diagnostics::with_channels(primary.clone(), Broken);
        let calls = Cell::new(0);

        let checked_div = diagnostics.wrap(|(a, b): (u32, u32)| {
            calls.set(calls.get() + 1);
            if b == 0 {
                panic!("division by zero");
            }
            a / b
        });

        assert_eq!(checked_div((10, 2)), Some(5));
        assert_eq!(checked_div((1, 0)), None);
        assert_eq!(checked_div((9, 3)), Some(3));
        assert_eq!(calls.get(), 3);
        assert_eq!(primary.text().matches("division by zero").count(), 1);
    }

    #[test]
    fn test_try_wrap_reports_join_errors() {
        let primary = Capture::default();
        let diagnostics = Diagnostics::with_channels(primary.clone(), Broken);

        let join = diagnostics
            .try_wrap(|delimiter: &str| crate::join_list(&["a", "b"], 0, 2, delimiter));

        assert_eq!(join("::"), None);
        assert!(primary.text().starts_with(DEFAULT_PREFIX));
        assert!(primary.text().contains("Delimiter is expected"));

        assert_eq!(join("|"), Some("a|b".to_string()));
        assert_eq!(primary.text().lines().count(), 1);
    }

    #[test]
    fn test_try_wrap_reports_panics_too() {
        let primary = Capture::default();
        let diagnostics = Diagnostics::with_channels(primary.clone(), Broken);

        let parse = diagnostics.try_wrap(|s: &str| {
            if s.is_empty() {
                panic!("empty input");
            }
            s.parse::<u8>()
        });

        assert_eq!(parse("7"), Some(7));
        assert_eq!(parse("x"), None);
        assert_eq!(parse(""), None);
        assert_eq!(primary.text().lines().count(), 2);
        assert!(primary.text().contains("empty input"));
    }

    #[test]
    fn test_panic_report_carries_payload_text_only() {
        let primary = Capture::default();
        let diagnostics = Diagnostics::with_channels(primary.clone(), Broken);

        let result: Option<()> = diagnostics.call(|| panic!("boom"));

        assert_eq!(result, None);
        assert_eq!(primary.text(), "warn service-messages: boom\n");
    }

    #[test]
    fn test_failure_report_deduplicates_message() {
        let failure = Failure::new("boom", "Error: boom\n    at <anonymous>");
        assert_eq!(failure.report(), "Error: boom\n    at <anonymous>");

        let failure = Failure::new("boom", "    at <anonymous>");
        assert_eq!(failure.report(), "boom\n    at <anonymous>");

        let failure = Failure::new("boom", "");
        assert_eq!(failure.report(), "boom");
        assert_eq!(failure.to_string(), "boom");
    }

    #[test]
    fn test_failure_from_non_string_panic() {
        let payload: Box<dyn Any + Send> = Box::new(17_u32);
        let failure = Failure::from_panic(payload.as_ref());
        assert_eq!(failure.message, "<non-string panic payload>");
    }
}
