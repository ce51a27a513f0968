// HTML reporter - single-page report with summary and result rows

use super::node::{escape_text, NodeId, ReportTree};
use super::Reporter;
use crate::event::{Suite, SuiteId, TestCase};
use crate::state::Aggregator;
use crate::time::format_duration;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Marker prefixed to suite titles.
const SUITE_MARKER: &str = "\u{25B8}";

const STYLE: &str = "\
body { font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 2em; color: #222; }
h1 { font-size: 1.4em; }
table { border-collapse: collapse; margin-bottom: 2em; min-width: 40em; }
th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: left; }
th { background: #eee; }
tr.suite td.title { font-weight: bold; }
tr.failed td.title { color: #b00020; }
td.numeric { text-align: right; font-variant-numeric: tabular-nums; }
";

#[derive(Debug, Clone)]
pub struct HtmlOptions {
    pub title: String,
    pub indent_px: u32,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            title: "Test Report".to_string(),
            indent_px: 18,
        }
    }
}

/// HTML reporter.
///
/// Result rows accumulate in event order as a flat table body; suite
/// rows are completed later through a side table so a suite's pass
/// count and duration land on the row opened at its start.
pub struct HtmlReporter {
    output: Option<PathBuf>,
    opts: HtmlOptions,
    rows: ReportTree,
    suite_rows: HashMap<SuiteId, NodeId>,
}

impl HtmlReporter {
    pub fn new(output: Option<PathBuf>, opts: HtmlOptions) -> Self {
        Self {
            output,
            opts,
            rows: ReportTree::new("tbody"),
            suite_rows: HashMap::new(),
        }
    }

    /// Assemble the full page around the accumulated rows.
    pub fn render_document(&self, state: &Aggregator, at: DateTime<Utc>) -> String {
        let totals = state.totals();

        let mut summary = ReportTree::new("tbody");
        let row = summary.create_node(summary.root(), "tr");
        for value in [
            totals.suites.to_string(),
            totals.tests.to_string(),
            totals.failures.to_string(),
            totals.success_rate_display(),
            format_duration(state.elapsed_ms(at)),
        ] {
            let td = summary.create_node(row, "td");
            summary.set_attr(td, "class", "numeric");
            summary.set_text(td, value);
        }

        let mut doc = document_head(&self.opts.title);
        doc.push_str(&format!("<h1>{}</h1>\n", escape_text(&self.opts.title)));
        doc.push_str("<table class=\"summary\">\n<thead>\n<tr><th>Suites</th><th>Tests</th><th>Failed</th><th>Success Rate</th><th>Duration</th></tr>\n</thead>\n");
        doc.push_str(&summary.to_html());
        doc.push_str("</table>\n");
        doc.push_str("<table class=\"results\">\n<thead>\n<tr><th>Name</th><th>Details</th><th>Duration</th></tr>\n</thead>\n");
        doc.push_str(&self.rows.to_html());
        doc.push_str("</table>\n</body>\n</html>\n");
        doc
    }

    fn push_test_row(&mut self, test: &TestCase, state: &Aggregator) {
        let row = self.rows.create_node(self.rows.root(), "tr");
        let class = if test.error.is_some() {
            "test failed"
        } else {
            "test"
        };
        self.rows.set_attr(row, "class", class);

        let name = self.rows.create_node(row, "td");
        self.rows.set_attr(name, "class", "title");
        let pad = state.depth() as u32 * self.opts.indent_px;
        if pad > 0 {
            self.rows
                .set_attr(name, "style", format!("padding-left: {}px", pad));
        }
        self.rows.set_text(name, test.name.as_str());

        let details = self.rows.create_node(row, "td");
        self.rows.set_attr(details, "class", "details");
        if let Some(error) = &test.error {
            self.rows.set_text(details, error.message.as_str());
        }

        let duration = self.rows.create_node(row, "td");
        self.rows.set_attr(duration, "class", "numeric duration");
        self.rows.set_text(duration, format_duration(test.elapsed_ms));
    }

    fn write_report(&mut self, state: &Aggregator, at: DateTime<Utc>) -> Result<()> {
        let html = self.render_document(state, at);

        match &self.output {
            Some(path) => {
                let mut file = File::create(path).with_context(|| {
                    format!("failed to create HTML report file: {}", path.display())
                })?;
                file.write_all(html.as_bytes())
                    .context("failed to write HTML report content")?;
                tracing::info!("HTML report written to {}", path.display());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(html.as_bytes())
                    .context("failed to write HTML report to stdout")?;
            }
        }

        self.rows = ReportTree::new("tbody");
        self.suite_rows.clear();
        Ok(())
    }
}

impl Reporter for HtmlReporter {
    fn on_suite_start(&mut self, suite: &Suite, state: &Aggregator) {
        if suite.is_root() {
            return;
        }

        let row = self.rows.create_node(self.rows.root(), "tr");
        self.rows.set_attr(row, "class", "suite");

        let title = self.rows.create_node(row, "td");
        self.rows.set_attr(title, "class", "title");
        // depth() already counts this suite, so top level sits at 1.
        let depth = state.depth() as u32;
        if depth > 1 {
            self.rows.set_attr(
                title,
                "style",
                format!("padding-left: {}px", (depth - 1) * self.opts.indent_px),
            );
        }
        self.rows
            .set_text(title, format!("{} {}", SUITE_MARKER, suite.name));

        self.suite_rows.insert(suite.id, row);
    }

    fn on_test_pass(&mut self, test: &TestCase, state: &Aggregator) {
        self.push_test_row(test, state);
    }

    fn on_test_fail(&mut self, test: &TestCase, state: &Aggregator) {
        self.push_test_row(test, state);
    }

    fn on_suite_end(&mut self, suite: &Suite, state: &Aggregator, at: DateTime<Utc>) -> Result<()> {
        if suite.is_root() {
            return self.write_report(state, at);
        }

        let Some(&row) = self.suite_rows.get(&suite.id) else {
            return Ok(());
        };

        if suite.failures > 0 {
            self.rows.set_attr(row, "class", "suite failed");
        }

        let passed = self.rows.create_node(row, "td");
        self.rows.set_attr(passed, "class", "details");
        self.rows.set_text(
            passed,
            format!("{}/{} tests passed", suite.passed(), suite.tests),
        );

        let duration = self.rows.create_node(row, "td");
        self.rows.set_attr(duration, "class", "numeric duration");
        let elapsed = state.suite_elapsed_ms(suite.id, at).unwrap_or(0);
        self.rows.set_text(duration, format_duration(elapsed));

        self.suite_rows.remove(&suite.id);
        Ok(())
    }
}

fn document_head(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n",
        escape_text(title),
        STYLE
    )
}
