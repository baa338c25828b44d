/// Builds a [`ServiceMessage`](crate::ServiceMessage).
///
/// Attribute names are written as identifiers, values are any `ToString`.
///
/// ```rust
/// use service_messages::service_message;
///
/// let started = service_message!("testStarted", name = "adds", nodeId = 3);
/// assert_eq!(started.to_string(), "##teamcity[testStarted name='adds' nodeId='3']");
///
/// let progress = service_message!("progressMessage", "step [1]");
/// assert_eq!(progress.to_string(), "##teamcity[progressMessage 'step |[1|]']");
/// ```
#[macro_export]
macro_rules! service_message {
    // Bare message
    ($name:expr $(,)?) => {
        $crate::ServiceMessage::new($name)
    };

    // Attribute form
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {{
        let message = $crate::ServiceMessage::new($name);
        $(
            let message = message.attr(
                stringify!($key),
                ::std::string::ToString::to_string(&$value),
            );
        )+
        message
    }};

    // Single-value form
    ($name:expr, $value:expr $(,)?) => {
        $crate::ServiceMessage::single($name, ::std::string::ToString::to_string(&$value))
    };
}
