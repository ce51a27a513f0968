// JUnit reporter - writes the run as JUnit-style XML

use super::node::{NodeId, ReportTree};
use super::Reporter;
use crate::event::{Suite, SuiteId, TestCase};
use crate::state::Aggregator;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// JUnit XML reporter.
///
/// Builds the element tree as events arrive and serializes it once the
/// root suite closes. Suites map to their tree nodes through a side
/// table keyed by suite id.
pub struct JunitReporter {
    output: Option<PathBuf>,
    tree: ReportTree,
    suite_nodes: HashMap<SuiteId, NodeId>,
}

impl JunitReporter {
    /// Create a JUnit reporter writing to the given file, or stdout
    /// when no path is given.
    pub fn new(output: Option<PathBuf>) -> Self {
        Self {
            output,
            tree: ReportTree::new("testsuites"),
            suite_nodes: HashMap::new(),
        }
    }

    /// Serialize the current tree with the XML declaration.
    pub fn render(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&self.tree.to_xml());
        xml
    }

    fn push_test_case(&mut self, test: &TestCase) {
        let Some(&parent) = self.suite_nodes.get(&test.suite) else {
            tracing::warn!(
                "test '{}' reports into unknown suite {}, skipping",
                test.name,
                test.suite.0
            );
            return;
        };

        let case = self.tree.create_node(parent, "testcase");
        self.tree.set_attr(case, "name", test.name.as_str());
        self.tree
            .set_attr(case, "time", format!("{:.3}", test.elapsed_ms as f64 / 1000.0));

        if let Some(error) = &test.error {
            let failure = self.tree.create_node(case, "failure");
            self.tree.set_attr(failure, "type", error.kind_or_default());
            self.tree.set_attr(failure, "message", error.message.as_str());
            if let Some(stack) = &error.stack {
                self.tree.set_text(failure, stack.as_str());
            }
        }
    }

    fn write_report(&mut self) -> Result<()> {
        let xml = self.render();

        match &self.output {
            Some(path) => {
                let mut file = File::create(path).with_context(|| {
                    format!("failed to create JUnit report file: {}", path.display())
                })?;
                file.write_all(xml.as_bytes())
                    .context("failed to write JUnit XML content")?;
                tracing::info!("JUnit report written to {}", path.display());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(xml.as_bytes())
                    .context("failed to write JUnit XML to stdout")?;
            }
        }

        self.tree = ReportTree::new("testsuites");
        self.suite_nodes.clear();
        Ok(())
    }
}

impl Reporter for JunitReporter {
    fn on_suite_start(&mut self, suite: &Suite, _state: &Aggregator) {
        if suite.is_root() {
            return;
        }

        // Suites whose parent was never started attach at the top.
        let parent = suite
            .parent
            .and_then(|p| self.suite_nodes.get(&p).copied())
            .unwrap_or(self.tree.root());

        let node = self.tree.create_node(parent, "testsuite");
        self.tree.set_attr(node, "name", suite.name.as_str());
        self.suite_nodes.insert(suite.id, node);
    }

    fn on_test_pass(&mut self, test: &TestCase, _state: &Aggregator) {
        self.push_test_case(test);
    }

    fn on_test_fail(&mut self, test: &TestCase, _state: &Aggregator) {
        self.push_test_case(test);
    }

    fn on_suite_end(&mut self, suite: &Suite, state: &Aggregator, at: DateTime<Utc>) -> Result<()> {
        if suite.is_root() {
            return self.write_report();
        }

        let Some(&node) = self.suite_nodes.get(&suite.id) else {
            return Ok(());
        };

        let elapsed = state.suite_elapsed_ms(suite.id, at).unwrap_or(0);
        self.tree.set_attr(node, "tests", suite.tests.to_string());
        self.tree
            .set_attr(node, "failures", suite.failures.to_string());
        self.tree
            .set_attr(node, "time", format!("{:.3}", elapsed as f64 / 1000.0));

        self.suite_nodes.remove(&suite.id);
        Ok(())
    }
}
