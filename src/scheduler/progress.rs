//! Progress reporting capability.
//!
//! The engine never talks to a front-end directly. It reports through a
//! [`ProgressReporter`] passed into each run.

use std::time::Duration;

use super::evolution::{RunOutcome, RunPhase};

/// Receives progress from a running search.
pub trait ProgressReporter {
    /// Called at a fixed cadence with time spent and the time budget.
    fn report_progress(&mut self, elapsed: Duration, limit: Duration);

    /// Asked at the checkpoint generation when no schedule is valid yet.
    ///
    /// Returning `false` pauses the run.
    fn confirm_continue(&mut self) -> bool;

    /// Called when the loop enters a new phase.
    fn on_phase(&mut self, _phase: RunPhase) {}

    /// Called once when the run ends.
    fn on_finished(&mut self, _outcome: &RunOutcome) {}
}

/// Reporter that ignores progress and always keeps running.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report_progress(&mut self, _elapsed: Duration, _limit: Duration) {}

    fn confirm_continue(&mut self) -> bool {
        true
    }
}
