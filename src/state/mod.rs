// State module - run aggregation

pub mod aggregate;

pub use aggregate::Aggregator;

/// Whole-run counters, folded in as top-level suites close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub suites: usize,
    pub tests: usize,
    pub failures: usize,
}

impl RunTotals {
    pub fn passed(&self) -> usize {
        self.tests.saturating_sub(self.failures)
    }

    pub fn all_passed(&self) -> bool {
        self.failures == 0
    }

    /// Percentage of passing tests, rounded to two decimal places.
    /// `None` when the run had no tests at all.
    pub fn success_rate(&self) -> Option<f64> {
        if self.tests == 0 {
            return None;
        }
        let ratio = 1.0 - self.failures as f64 / self.tests as f64;
        Some((ratio * 10000.0).round() / 100.0)
    }

    /// Success rate for display: trailing zeros trimmed, "N/A" for an
    /// empty run.
    pub fn success_rate_display(&self) -> String {
        match self.success_rate() {
            Some(rate) => {
                let mut text = format!("{:.2}", rate);
                while text.ends_with('0') {
                    text.pop();
                }
                if text.ends_with('.') {
                    text.pop();
                }
                format!("{}%", text)
            }
            None => "N/A".to_string(),
        }
    }
}
