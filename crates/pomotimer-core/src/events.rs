use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerMode, TimerSnapshot};

/// How long the presentation layer keeps its completion pulse visible.
pub const COMPLETION_PULSE_SECS: u64 = 2;

/// Every state change in the engine produces an Event.
/// The presentation layer renders them; the engine never performs I/O itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSelected {
        mode: TimerMode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        mode: TimerMode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    /// An interval finished, naturally or by skip, and the transition rule ran.
    TimerCompleted {
        completed: TimerMode,
        next: TimerMode,
        completed_pomodoros: u32,
        /// The next interval is already counting down.
        auto_started: bool,
        skipped: bool,
        /// Whether the alarm cue should be played.
        play_sound: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        #[serde(flatten)]
        snapshot: TimerSnapshot,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for [`Event::TimerCompleted`].
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
