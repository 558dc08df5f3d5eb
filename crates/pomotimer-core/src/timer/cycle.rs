use serde::{Deserialize, Serialize};

use super::engine::TimerEngine;
use super::mode::TimerMode;

/// Longest projection [`upcoming`] will build.
pub const MAX_PLAN_LEN: usize = 1000;

/// One interval in a projected cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedInterval {
    pub mode: TimerMode,
    pub duration_secs: u64,
    /// Completed pomodoros once this interval has finished.
    pub completed_pomodoros_after: u32,
}

/// The next `count` intervals the engine moves through if each one runs to
/// completion, starting with the current interval (at its remaining time).
///
/// Works on a clone; `engine` is left untouched. `count` is capped at
/// [`MAX_PLAN_LEN`].
pub fn upcoming(engine: &TimerEngine, count: usize) -> Vec<PlannedInterval> {
    let count = count.min(MAX_PLAN_LEN);
    let mut projected = engine.clone();
    let mut plan = Vec::with_capacity(count);

    for _ in 0..count {
        let mode = projected.mode();
        let duration_secs = projected.time_left_secs();
        projected.skip();
        plan.push(PlannedInterval {
            mode,
            duration_secs,
            completed_pomodoros_after: projected.completed_pomodoros(),
        });
    }

    plan
}

/// Total seconds covered by `plan`.
pub fn total_secs(plan: &[PlannedInterval]) -> u64 {
    plan.iter().map(|p| p.duration_secs).sum()
}
