// Tests for event stream validation - public API only

use std::io::Cursor;

use reportify::cli::args::CheckArgs;
use reportify::commands::check::{check_stream, handle_check};
use reportify::event::EventStream;
use reportify::report::{Diagnostic, DiagnosticSeverity};

fn check(input: &str) -> Vec<Diagnostic> {
    check_stream("run.jsonl", EventStream::new(Cursor::new(input)))
}

fn codes(diags: &[Diagnostic]) -> Vec<&str> {
    diags.iter().map(|d| d.code.as_str()).collect()
}

#[test]
fn test_clean_stream_produces_no_diagnostics() {
    // Arrange: declared counts match the tallied events, root declares none.
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_start","suite":{"id":2,"name":"auth","parent":1}}
{"event":"test_pass","test":{"name":"login works","suite":2,"elapsed_ms":42}}
{"event":"test_fail","test":{"name":"logout","suite":2,"elapsed_ms":7,"error":{"kind":"AssertionError","message":"expected 200","stack":"at logout"}}}
{"event":"suite_end","suite":{"id":2,"name":"auth","parent":1,"tests":2,"failures":1}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
}

#[test]
fn test_parse_error_reports_offending_line() {
    // Arrange
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_start","suite":{"id":2,"name":"auth","parent":1}}
this is not json
{"event":"test_pass","test":{"name":"login works","suite":2,"elapsed_ms":42}}
{"event":"suite_end","suite":{"id":2,"name":"auth","parent":1,"tests":1,"failures":0}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["PARSE_ERROR"]);
    assert_eq!(diags[0].line, 3);
    assert!(diags[0].is_error());
}

#[test]
fn test_suite_before_root_is_bad_parent_and_root_missing() {
    // Arrange
    let input = r#"{"event":"suite_start","suite":{"id":2,"name":"auth","parent":1}}
{"event":"suite_end","suite":{"id":2,"name":"auth","parent":1}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["BAD_PARENT", "MISSING_ROOT"]);
    assert!(diags[0].message.contains("before any root suite"));
}

#[test]
fn test_bad_parent_against_innermost_open_suite() {
    // Arrange: b claims the root as parent while a is still open.
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_start","suite":{"id":2,"name":"a","parent":1}}
{"event":"suite_start","suite":{"id":3,"name":"b","parent":1}}
{"event":"suite_end","suite":{"id":3,"name":"b","parent":1}}
{"event":"suite_end","suite":{"id":2,"name":"a","parent":1}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["BAD_PARENT"]);
    assert_eq!(diags[0].line, 3);
    assert!(diags[0].message.contains("innermost open suite is 'a'"));
}

#[test]
fn test_second_root_while_first_still_open() {
    // Arrange
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_start","suite":{"id":5,"name":"rogue"}}
{"event":"suite_end","suite":{"id":5,"name":"rogue"}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["UNEXPECTED_ROOT"]);
    assert_eq!(diags[0].line, 2);
    assert!(diags[0].message.contains("'rogue'"));
}

#[test]
fn test_orphan_test_outside_any_suite() {
    // Arrange
    let input = r#"{"event":"test_pass","test":{"name":"stray","suite":2,"elapsed_ms":1}}
{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["ORPHAN_TEST"]);
    assert_eq!(diags[0].line, 1);
    assert!(diags[0].is_error());
}

#[test]
fn test_suite_mismatch_is_warning_and_still_counts() {
    // Arrange: the test names a suite id that is not the innermost one,
    // yet the declared counts match because the tally keeps it.
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_start","suite":{"id":2,"name":"auth","parent":1}}
{"event":"test_pass","test":{"name":"drifted","suite":9,"elapsed_ms":1}}
{"event":"suite_end","suite":{"id":2,"name":"auth","parent":1,"tests":1,"failures":0}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["SUITE_MISMATCH"]);
    assert!(!diags[0].is_error());
    assert!(matches!(diags[0].severity, DiagnosticSeverity::Warning));
}

#[test]
fn test_stray_suite_end_is_unbalanced() {
    // Arrange
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_start","suite":{"id":2,"name":"auth","parent":1}}
{"event":"suite_end","suite":{"id":7,"name":"ghost","parent":1}}
{"event":"suite_end","suite":{"id":2,"name":"auth","parent":1}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["UNBALANCED_SUITE"]);
    assert!(diags[0].message.contains("does not match any open suite"));
}

#[test]
fn test_suite_end_closing_over_open_children() {
    // Arrange: a ends while b is still open under it.
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_start","suite":{"id":2,"name":"a","parent":1}}
{"event":"suite_start","suite":{"id":3,"name":"b","parent":2}}
{"event":"suite_end","suite":{"id":2,"name":"a","parent":1}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["UNBALANCED_SUITE"]);
    assert!(diags[0]
        .message
        .contains("closes over still-open suite(s): b"));
}

#[test]
fn test_count_mismatch_between_declared_and_tallied() {
    // Arrange
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_start","suite":{"id":2,"name":"auth","parent":1}}
{"event":"test_pass","test":{"name":"only one","suite":2,"elapsed_ms":1}}
{"event":"suite_end","suite":{"id":2,"name":"auth","parent":1,"tests":5,"failures":2}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["COUNT_MISMATCH"]);
    assert!(!diags[0].is_error());
    assert!(diags[0].message.contains("declares 5 test(s) and 2 failure(s)"));
    assert!(diags[0].message.contains("contains 1 and 0"));
}

#[test]
fn test_fail_without_error_object_warns_with_hint() {
    // Arrange
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_start","suite":{"id":2,"name":"auth","parent":1}}
{"event":"test_fail","test":{"name":"bare failure","suite":2,"elapsed_ms":1}}
{"event":"suite_end","suite":{"id":2,"name":"auth","parent":1,"tests":1,"failures":1}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["FAIL_WITHOUT_ERROR"]);
    assert!(!diags[0].is_error());
    assert_eq!(
        diags[0].hint.as_deref(),
        Some("attach an error with kind, message, and stack")
    );
}

#[test]
fn test_events_after_root_close_are_flagged() {
    // Arrange
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_end","suite":{"id":1,"name":"run"}}
{"event":"test_pass","test":{"name":"late","suite":1,"elapsed_ms":1}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(codes(&diags), vec!["EVENT_AFTER_ROOT"]);
    assert_eq!(diags[0].line, 3);
    assert!(diags[0]
        .message
        .contains("test_pass event after the root suite closed"));
}

#[test]
fn test_unclosed_suites_reported_innermost_first() {
    // Arrange
    let input = r#"{"event":"suite_start","suite":{"id":1,"name":"run"}}
{"event":"suite_start","suite":{"id":2,"name":"a","parent":1}}
{"event":"suite_start","suite":{"id":3,"name":"b","parent":2}}
"#;

    // Act
    let diags = check(input);

    // Assert
    assert_eq!(
        codes(&diags),
        vec!["UNCLOSED_SUITE", "UNCLOSED_SUITE", "UNCLOSED_SUITE"]
    );
    assert!(diags[0].message.contains("'b'"));
    assert!(diags[1].message.contains("'a'"));
    assert!(diags[2].message.contains("'run'"));
    assert_eq!(
        diags.iter().map(|d| d.line).collect::<Vec<_>>(),
        vec![3, 2, 1]
    );
}

#[test]
fn test_empty_stream_is_an_error() {
    // Arrange & Act
    let empty = check("");
    let blanks = check("\n\n   \n");

    // Assert
    assert_eq!(codes(&empty), vec!["EMPTY_STREAM"]);
    assert_eq!(empty[0].line, 1);
    assert_eq!(codes(&blanks), vec!["EMPTY_STREAM"]);
}

#[test]
fn test_handle_check_accepts_clean_file() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("run.jsonl");
    std::fs::write(
        &path,
        concat!(
            "{\"event\":\"suite_start\",\"suite\":{\"id\":1,\"name\":\"run\"}}\n",
            "{\"event\":\"suite_start\",\"suite\":{\"id\":2,\"name\":\"auth\",\"parent\":1}}\n",
            "{\"event\":\"test_pass\",\"test\":{\"name\":\"ok\",\"suite\":2,\"elapsed_ms\":1}}\n",
            "{\"event\":\"suite_end\",\"suite\":{\"id\":2,\"name\":\"auth\",\"parent\":1,\"tests\":1,\"failures\":0}}\n",
            "{\"event\":\"suite_end\",\"suite\":{\"id\":1,\"name\":\"run\"}}\n",
        ),
    )
    .expect("Failed to write event log");

    let args = CheckArgs {
        files: vec![path],
        format: "text".to_string(),
    };

    // Act
    let result = handle_check(&args);

    // Assert
    assert!(result.is_ok());
}
