// Run aggregation - counters, nesting depth, per-suite clocks

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::event::{EventRecord, RunEvent, Suite, SuiteId};
use crate::state::RunTotals;

/// Accumulates run state from the event stream.
///
/// One aggregator per run; reporters read from it but never write.
/// Suite totals fold into the run totals only when the enclosing
/// top-level suite closes, so nested suites are never counted twice.
#[derive(Debug, Default)]
pub struct Aggregator {
    totals: RunTotals,
    depth: usize,
    clocks: HashMap<SuiteId, DateTime<Utc>>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the run state.
    pub fn apply(&mut self, rec: &EventRecord) {
        if self.started_at.is_none() {
            self.started_at = Some(rec.at);
        }

        match &rec.event {
            RunEvent::SuiteStart { suite, .. } => {
                if suite.is_root() {
                    return;
                }
                self.totals.suites += 1;
                self.depth += 1;
                self.clocks.insert(suite.id, rec.at);
            }
            RunEvent::SuiteEnd { suite, .. } => {
                if suite.is_root() {
                    self.finished_at = Some(rec.at);
                    return;
                }
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0 {
                    // Counts on the end payload cover the whole subtree.
                    self.totals.tests += suite.tests;
                    self.totals.failures += suite.failures;
                }
            }
            // Per-test outcomes reach the totals via suite_end payloads.
            RunEvent::TestPass { .. } | RunEvent::TestFail { .. } => {}
        }
    }

    /// Drop the suite's clock. Called after the end event has been
    /// dispatched so reporters can still read the suite's elapsed time
    /// while handling it.
    pub fn sweep(&mut self, suite: &Suite) {
        self.clocks.remove(&suite.id);
    }

    pub fn totals(&self) -> RunTotals {
        self.totals
    }

    /// Current nesting depth; a top-level suite sits at depth 1 while
    /// open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Milliseconds since the suite started, or `None` when no start
    /// was ever observed for it.
    pub fn suite_elapsed_ms(&self, id: SuiteId, now: DateTime<Utc>) -> Option<u64> {
        self.clocks
            .get(&id)
            .map(|start| (now - *start).num_milliseconds().max(0) as u64)
    }

    /// Milliseconds since the first observed event.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        match self.started_at {
            Some(start) => (now - start).num_milliseconds().max(0) as u64,
            None => 0,
        }
    }

    /// True once the root suite has closed.
    pub fn finished(&self) -> bool {
        self.finished_at.is_some()
    }
}
