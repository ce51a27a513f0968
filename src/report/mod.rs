// Report module - reporters and event fan-out

pub mod console;
pub mod diagnostics;
pub mod html;
pub mod junit;
pub mod node;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::event::{EventRecord, RunEvent, Suite, TestCase};
use crate::state::Aggregator;
pub use console::ConsoleReporter;
pub use diagnostics::{CheckReport, CheckSummary, Diagnostic, DiagnosticSeverity};
pub use html::{HtmlOptions, HtmlReporter};
pub use junit::JunitReporter;
pub use node::{NodeId, ReportTree};

/// Reporter trait. Hooks run synchronously, in event order, after the
/// aggregator has absorbed the event.
pub trait Reporter {
    /// Called when a suite starts, the root included.
    fn on_suite_start(&mut self, suite: &Suite, state: &Aggregator);

    /// Called when a test passed.
    fn on_test_pass(&mut self, test: &TestCase, state: &Aggregator);

    /// Called when a test failed.
    fn on_test_fail(&mut self, test: &TestCase, state: &Aggregator);

    /// Called when a suite ends; counts on the payload cover the whole
    /// subtree. Closing the root ends the run.
    fn on_suite_end(&mut self, suite: &Suite, state: &Aggregator, at: DateTime<Utc>) -> Result<()>;
}

/// Feed one event through the aggregator and every reporter.
pub fn dispatch(
    state: &mut Aggregator,
    reporters: &mut [Box<dyn Reporter>],
    rec: &EventRecord,
) -> Result<()> {
    state.apply(rec);

    match &rec.event {
        RunEvent::SuiteStart { suite, .. } => {
            for reporter in reporters.iter_mut() {
                reporter.on_suite_start(suite, state);
            }
        }
        RunEvent::TestPass { test, .. } => {
            for reporter in reporters.iter_mut() {
                reporter.on_test_pass(test, state);
            }
        }
        RunEvent::TestFail { test, .. } => {
            for reporter in reporters.iter_mut() {
                reporter.on_test_fail(test, state);
            }
        }
        RunEvent::SuiteEnd { suite, .. } => {
            for reporter in reporters.iter_mut() {
                reporter.on_suite_end(suite, state, rec.at)?;
            }
            // The suite clock stays readable through the end dispatch.
            state.sweep(suite);
        }
    }

    Ok(())
}
