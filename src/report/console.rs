// Console reporter - live progress plus a closing summary

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::Reporter;
use crate::cli::ProgressMode;
use crate::event::{Suite, TestCase};
use crate::state::{Aggregator, RunTotals};
use crate::time::format_duration;

/// Console reporter.
///
/// Per-test output depends on the progress mode; the summary block at
/// the end of the run prints in every mode.
pub struct ConsoleReporter {
    mode: ProgressMode,
    spinner: ProgressBar,
    dots: usize,
    failed: Vec<String>,
}

impl ConsoleReporter {
    pub fn new(mode: ProgressMode) -> Self {
        let spinner = if matches!(mode, ProgressMode::Bar) {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {msg}")
                    .unwrap(),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        Self {
            mode,
            spinner,
            dots: 0,
            failed: Vec::new(),
        }
    }

    fn mark(&mut self, c: char) {
        print!("{}", c);
        let _ = std::io::stdout().flush();

        self.dots += 1;
        if self.dots >= 80 {
            println!();
            self.dots = 0;
        }
    }

    /// Shared per-test path; pass or fail is read off the error field.
    fn test_line(&mut self, test: &TestCase, state: &Aggregator) {
        if let Some(error) = &test.error {
            self.failed.push(format!(
                "{} ({})\n      Error: {}",
                test.name,
                format_duration(test.elapsed_ms),
                error.message
            ));
        }

        match self.mode {
            ProgressMode::Dots => {
                if test.error.is_some() {
                    self.mark('E');
                } else {
                    self.mark('.');
                }
            }
            ProgressMode::Verbose => {
                let indent = "  ".repeat(state.depth());
                match &test.error {
                    None => println!(
                        "{}{} {} ({})",
                        indent,
                        style("PASS").green().bold(),
                        test.name,
                        format_duration(test.elapsed_ms)
                    ),
                    Some(error) => println!(
                        "{}{} {}: {}",
                        indent,
                        style("FAIL").red().bold(),
                        test.name,
                        error.message
                    ),
                }
            }
            ProgressMode::Bar => {
                self.spinner.tick();
            }
            ProgressMode::None => {}
        }
    }

    fn print_summary(&self, totals: RunTotals, duration_ms: u64) {
        println!();
        println!(
            "════════════════════════════════════════════════════════════════════════════════"
        );
        if totals.failures > 0 {
            println!(
                "❌ FAILED ({} failed, {} passed in {})",
                totals.failures,
                totals.passed(),
                format_duration(duration_ms)
            );
        } else {
            println!(
                "✅ PASSED ({} passed in {})",
                totals.passed(),
                format_duration(duration_ms)
            );
        }
        println!(
            "────────────────────────────────────────────────────────────────────────────────"
        );
        println!("📊 Run Statistics:");
        println!("   • Suites: {}", totals.suites);
        println!("   • Tests: {}", totals.tests);
        println!("   • Passed: {}", totals.passed());
        println!("   • Failed: {}", totals.failures);
        println!("   • Success rate: {}", totals.success_rate_display());
        println!("   • Duration: {}", format_duration(duration_ms));

        if !self.failed.is_empty() {
            println!(
                "────────────────────────────────────────────────────────────────────────────────"
            );
            println!("❌ Failed Tests:");
            for entry in &self.failed {
                println!("   • {}", entry);
            }
        }

        println!(
            "════════════════════════════════════════════════════════════════════════════════"
        );
        println!();
    }
}

impl Reporter for ConsoleReporter {
    fn on_suite_start(&mut self, suite: &Suite, state: &Aggregator) {
        if suite.is_root() {
            return;
        }

        match self.mode {
            ProgressMode::Verbose => {
                let indent = "  ".repeat(state.depth().saturating_sub(1));
                println!("{}▸ {}", indent, style(&suite.name).bold());
            }
            ProgressMode::Bar => {
                self.spinner.set_message(suite.name.clone());
                self.spinner.tick();
            }
            _ => {}
        }
    }

    fn on_test_pass(&mut self, test: &TestCase, state: &Aggregator) {
        self.test_line(test, state);
    }

    fn on_test_fail(&mut self, test: &TestCase, state: &Aggregator) {
        self.test_line(test, state);
    }

    fn on_suite_end(&mut self, suite: &Suite, state: &Aggregator, at: DateTime<Utc>) -> Result<()> {
        if !suite.is_root() {
            if matches!(self.mode, ProgressMode::Verbose) {
                let indent = "  ".repeat(state.depth());
                let elapsed = state.suite_elapsed_ms(suite.id, at).unwrap_or(0);
                println!(
                    "{}{}/{} tests passed ({})",
                    indent,
                    suite.passed(),
                    suite.tests,
                    format_duration(elapsed)
                );
            }
            return Ok(());
        }

        // Finish the dots line before the summary block.
        if matches!(self.mode, ProgressMode::Dots) && self.dots > 0 {
            println!();
        }
        self.spinner.finish_and_clear();

        self.print_summary(state.totals(), state.elapsed_ms(at));
        Ok(())
    }
}
