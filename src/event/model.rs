// Lifecycle event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a suite within one run, assigned by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiteId(pub u64);

/// A named grouping of tests, possibly nested.
///
/// The `tests`/`failures` counts cover the suite's whole subtree and are
/// meaningful on `suite_end` payloads; start payloads leave them at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suite {
    pub id: SuiteId,
    pub name: String,

    /// Parent suite id; the implicit root suite has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<SuiteId>,

    #[serde(default)]
    pub tests: usize,

    #[serde(default)]
    pub failures: usize,
}

impl Suite {
    /// The implicit root suite wraps the whole run and is never rendered.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn passed(&self) -> usize {
        self.tests.saturating_sub(self.failures)
    }
}

/// A single reported test. Immutable once reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,

    /// Enclosing suite id.
    pub suite: SuiteId,

    #[serde(default)]
    pub elapsed_ms: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TestError>,
}

/// Error attached to a failed test.
///
/// The producer declares the kind explicitly; there is no runtime type
/// inspection anywhere, only the generic fallback label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl TestError {
    /// Declared kind, or the generic classification.
    pub fn kind_or_default(&self) -> &str {
        self.kind.as_deref().unwrap_or("Error")
    }
}

/// One lifecycle event as it appears on the wire, tagged by `event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    SuiteStart {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ts: Option<DateTime<Utc>>,
        suite: Suite,
    },
    SuiteEnd {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ts: Option<DateTime<Utc>>,
        suite: Suite,
    },
    TestPass {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ts: Option<DateTime<Utc>>,
        test: TestCase,
    },
    TestFail {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ts: Option<DateTime<Utc>>,
        test: TestCase,
    },
}

impl RunEvent {
    /// Producer timestamp, if the record carried one.
    pub fn ts(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::SuiteStart { ts, .. }
            | Self::SuiteEnd { ts, .. }
            | Self::TestPass { ts, .. }
            | Self::TestFail { ts, .. } => *ts,
        }
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SuiteStart { .. } => "suite_start",
            Self::SuiteEnd { .. } => "suite_end",
            Self::TestPass { .. } => "test_pass",
            Self::TestFail { .. } => "test_fail",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_suite_start() {
        let line = r#"{"event":"suite_start","ts":"2026-03-01T12:00:00Z","suite":{"id":1,"name":"main","parent":null}}"#;

        let event: RunEvent = serde_json::from_str(line).unwrap();
        match &event {
            RunEvent::SuiteStart { ts, suite } => {
                assert!(ts.is_some());
                assert_eq!(suite.id, SuiteId(1));
                assert_eq!(suite.name, "main");
                assert!(suite.is_root());
                assert_eq!(suite.tests, 0);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_wire_shape_test_fail() {
        let line = r#"{"event":"test_fail","test":{"name":"logout","suite":2,"elapsed_ms":7,"error":{"kind":"AssertionError","message":"expected 200"}}}"#;

        let event: RunEvent = serde_json::from_str(line).unwrap();
        match &event {
            RunEvent::TestFail { ts, test } => {
                assert!(ts.is_none());
                assert_eq!(test.suite, SuiteId(2));
                assert_eq!(test.elapsed_ms, 7);
                let error = test.error.as_ref().unwrap();
                assert_eq!(error.kind_or_default(), "AssertionError");
                assert_eq!(error.message, "expected 200");
                assert!(error.stack.is_none());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_serialized_event_round_trips_tag() {
        let event = RunEvent::TestPass {
            ts: None,
            test: TestCase {
                name: "login works".to_string(),
                suite: SuiteId(2),
                elapsed_ms: 42,
                error: None,
            },
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""event":"test_pass""#));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_error_kind_fallback() {
        let error = TestError {
            kind: None,
            message: "boom".to_string(),
            stack: None,
        };

        assert_eq!(error.kind_or_default(), "Error");
    }

    #[test]
    fn test_suite_passed_never_underflows() {
        let suite = Suite {
            id: SuiteId(7),
            name: "odd".to_string(),
            parent: Some(SuiteId(1)),
            tests: 1,
            failures: 3,
        };

        assert_eq!(suite.passed(), 0);
    }
}
