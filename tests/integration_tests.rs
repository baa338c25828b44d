use service_messages::{
    escape, is_string, join_list, needs_escaping, Channel, Delimiter, Diagnostics, Error,
    EscapeMap, ListJoiner, MessageOptions, ServiceMessage,
};
use std::cell::RefCell;
use std::io;
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

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_escape_empty() {
    assert_eq!(escape(""), "");
    assert!(!needs_escaping(""));
}

#[test]
fn test_escape_is_not_idempotent() {
    let once = escape("a\nb").into_owned();
    assert_ne!(escape(&once), once);
}

#[test]
fn test_join_examples() {
    let empty: Vec<&str> = Vec::new();
    assert_eq!(join_list(&empty, 0, 0, ",").unwrap(), "");
    assert_eq!(join_list(&["a", "b"], 0, 2, "|").unwrap(), "a|b");
    assert_eq!(join_list(&["a|b", "c"], 0, 2, "|").unwrap(), r"a\|b|c");
}

#[test]
fn test_join_rejects_multi_char_delimiter() {
    let result = join_list(&["a", "b"], 0, 2, "||");
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert!(result.unwrap_err().to_string().contains("\"||\""));
}

#[test]
fn test_duplicate_mapping() {
    let mut map = EscapeMap::new();
    map.register("\n", "n").unwrap();
    assert!(matches!(
        map.register("\n", "n"),
        Err(Error::DuplicateMapping { from: '\n', .. })
    ));
}

#[test]
fn test_wrap_absorbs_failure() {
    init_logger();
    let primary = Capture::default();
    let diagnostics = Diagnostics::with_channels(primary.clone(), Capture::default());

    let failing = diagnostics.wrap(|_: ()| -> i32 { panic!("boom") });
    assert_eq!(failing(()), None);
    assert!(primary.text().contains("boom"));
}

#[test]
fn test_wrap_passes_through() {
    let primary = Capture::default();
    let diagnostics = Diagnostics::with_channels(primary.clone(), Capture::default());

    let answer = diagnostics.wrap(|_: ()| 42);
    assert_eq!(answer(()), Some(42));
    assert_eq!(primary.text(), "");
}

#[test]
fn test_test_runner_flow() {
    let out = Capture::default();
    let diagnostics = Diagnostics::with_channels(Capture::default(), Capture::default());

    let suite_path = ["Calculator", "when dividing", "by zero | negative"];
    let emitted = diagnostics.try_call(|| -> Result<(), Error> {
        let location = ListJoiner::new(Delimiter::Pipe).join(&suite_path, 0, 2)?;
        service_messages::service_message!("testSuiteStarted", name = location).emit(&out)?;

        ServiceMessage::new("testFailed")
            .attr("name", suite_path[2])
            .attr("nodeId", 7.to_string())
            .attr("message", "expected 'Infinity'")
            .attr("details", "AssertionError\n    at divide [calc.js:3]")
            .emit(&out)
    });

    assert_eq!(emitted, Some(()));
    assert_eq!(
        out.text(),
        "##teamcity[testSuiteStarted name='Calculator||when dividing']\n\
         ##teamcity[testFailed name='by zero || negative' nodeId='7' \
         message='expected |'Infinity|'' details='AssertionError|n    at divide |[calc.js:3|]']\n"
    );
}

#[test]
fn test_try_call_reports_join_error() {
    let primary = Capture::default();
    let diagnostics = Diagnostics::with_channels(primary.clone(), Capture::default())
        .with_prefix("warn mocha-intellij: ");

    let result = diagnostics.try_call(|| join_list(&["a"], 0, 1, ", "));

    assert_eq!(result, None);
    assert!(primary
        .text()
        .starts_with("warn mocha-intellij: Invalid argument: Delimiter is expected"));
}

#[test]
fn test_capability_check_guards_escaping() {
    let payloads: Vec<Box<dyn std::any::Any>> =
        vec![Box::new("it's"), Box::new(3_u8), Box::new(String::from("[x]"))];

    let escaped: Vec<String> = payloads
        .iter()
        .filter_map(|value| service_messages::as_str(value.as_ref()))
        .map(|s| escape(s).into_owned())
        .collect();

    assert!(is_string(payloads[0].as_ref()));
    assert!(!is_string(payloads[1].as_ref()));
    assert_eq!(escaped, vec!["it|'s".to_string(), "|[x|]".to_string()]);
}

#[test]
fn test_try_wrapped_reporter_skips_bad_delimiter() {
    init_logger();
    let out = Capture::default();
    let primary = Capture::default();
    let diagnostics = Diagnostics::with_channels(primary.clone(), Capture::default());
    let options = MessageOptions::new().with_marker("##vso");

    let report = diagnostics.try_wrap(|delimiter: &str| -> Result<(), Error> {
        let tags = join_list(&["slow", "db;pg"], 0, 2, delimiter)?;
        ServiceMessage::new("metadata")
            .with_options(options.clone())
            .attr("tags", tags)
            .emit(&out)
    });

    assert_eq!(report("::"), None);
    assert_eq!(out.text(), "");
    assert!(primary.text().contains("Delimiter is expected"));

    assert_eq!(report(";"), Some(()));
    assert_eq!(out.text(), "##vso[metadata tags='slow;db\\;pg']\n");
    assert_eq!(primary.text().lines().count(), 1);
}
