//! String capability checks for values of unknown type.
//!
//! The escaping and joining APIs take `&str`, so inside Rust these checks are
//! never needed. They exist for call sites that receive type-erased values
//! (`&dyn Any`), such as reporter callbacks carrying arbitrary payloads, and
//! must decide whether a value can be fed to the escapers at all.
//!
//! A *string primitive* is an owned or borrowed plain string (`String`,
//! `&str`). A *string* is a primitive or one of the common wrappers around
//! one (`Box<str>`, `Rc<str>`, `Arc<str>`, `Cow<'static, str>`, and boxed,
//! reference counted `String`s).
//!
//! ```rust
//! use service_messages::{as_str, is_string, is_string_primitive};
//! use std::sync::Arc;
//!
//! let shared: Arc<str> = Arc::from("suite");
//! assert!(is_string(&shared));
//! assert!(!is_string_primitive(&shared));
//! assert_eq!(as_str(&shared), Some("suite"));
//! assert!(!is_string(&42));
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// Returns `true` if `value` is a `String` or a `&'static str`.
#[must_use]
pub fn is_string_primitive(value: &dyn Any) -> bool {
    value.is::<String>() || value.is::<&'static str>()
}

/// Returns `true` if `value` is a string primitive or a wrapper around one.
#[must_use]
pub fn is_string(value: &dyn Any) -> bool {
    as_str(value).is_some()
}

/// Borrows the text of `value` if [`is_string`] holds for it.
#[must_use]
pub fn as_str(value: &dyn Any) -> Option<&str> {
    if let Some(s) = value.downcast_ref::<String>() {
        Some(s.as_str())
    } else if let Some(s) = value.downcast_ref::<&'static str>() {
        Some(*s)
    } else if let Some(s) = value.downcast_ref::<Box<str>>() {
        Some(&**s)
    } else if let Some(s) = value.downcast_ref::<Rc<str>>() {
        Some(&**s)
    } else if let Some(s) = value.downcast_ref::<Arc<str>>() {
        Some(&**s)
    } else if let Some(s) = value.downcast_ref::<Cow<'static, str>>() {
        Some(&**s)
    } else if let Some(s) = value.downcast_ref::<Box<String>>() {
        Some(s.as_str())
    } else if let Some(s) = value.downcast_ref::<Rc<String>>() {
        Some(s.as_str())
    } else if let Some(s) = value.downcast_ref::<Arc<String>>() {
        Some(s.as_str())
    } else {
        None
    }
}
