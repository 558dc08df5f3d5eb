//! Timer engine implementation.
//!
//! The engine is a tick-driven state machine. It does not own a clock or a
//! thread - the host calls `tick()` once per second while the timer runs
//! (see [`TimerDriver`](super::TimerDriver)).
//!
//! ## State Transitions
//!
//! ```text
//! Pomodoro --complete--> ShortBreak | LongBreak --complete--> Pomodoro
//! ```
//!
//! Each mode can be running or paused. Every `n`-th completed pomodoro
//! (`pomodoros_before_long_break`) is followed by a long break.
//!
//! ## Usage
//!
//! ```
//! use pomotimer_core::{Command, Settings, TimerEngine};
//!
//! let mut engine = TimerEngine::new(Settings::default());
//! engine.apply(Command::Start);
//! // Once per second:
//! let completed = engine.apply(Command::Tick); // Some(Event::TimerCompleted) at zero
//! # assert!(completed.is_none());
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clock;
use super::mode::TimerMode;
use super::settings::Settings;
use crate::events::Event;

/// Everything that can change the engine's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Start,
    Pause,
    Reset,
    Skip,
    SelectMode { mode: TimerMode },
    UpdateSettings { settings: Settings },
    Tick,
}

/// Serializable copy of the engine state for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub time_left_secs: u64,
    pub total_secs: u64,
    pub is_running: bool,
    pub completed_pomodoros: u32,
    /// 0.0 .. 1.0 progress within the current interval.
    pub progress: f64,
}

/// Core timer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    settings: Settings,
    mode: TimerMode,
    time_left_secs: u64,
    is_running: bool,
    completed_pomodoros: u32,
}

impl TimerEngine {
    /// Create a paused engine at the start of a pomodoro.
    pub fn new(settings: Settings) -> Self {
        let time_left_secs = TimerMode::Pomodoro.duration_secs(&settings);
        Self {
            settings,
            mode: TimerMode::Pomodoro,
            time_left_secs,
            is_running: false,
            completed_pomodoros: 0,
        }
    }

    /// Rebuild an engine from published state, e.g. to preview the cycle
    /// from a [`TimerSnapshot`]. Time left is capped at the mode's length.
    pub fn restore(settings: Settings, snapshot: &TimerSnapshot) -> Self {
        let total = snapshot.mode.duration_secs(&settings);
        Self {
            settings,
            mode: snapshot.mode,
            time_left_secs: snapshot.time_left_secs.min(total),
            is_running: snapshot.is_running,
            completed_pomodoros: snapshot.completed_pomodoros,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn completed_pomodoros(&self) -> u32 {
        self.completed_pomodoros
    }

    /// Full length of the current mode.
    pub fn total_secs(&self) -> u64 {
        self.mode.duration_secs(&self.settings)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let total_secs = self.total_secs();
        TimerSnapshot {
            mode: self.mode,
            time_left_secs: self.time_left_secs,
            total_secs,
            is_running: self.is_running,
            completed_pomodoros: self.completed_pomodoros,
            progress: clock::progress(self.time_left_secs, total_secs),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Single mutation entry point; every command and tick goes through here.
    pub fn apply(&mut self, command: Command) -> Option<Event> {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::Skip => self.skip(),
            Command::SelectMode { mode } => self.select_mode(mode),
            Command::UpdateSettings { settings } => self.update_settings(settings),
            Command::Tick => self.tick(),
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.is_running || self.time_left_secs == 0 {
            return None;
        }
        self.is_running = true;
        debug!(mode = ?self.mode, time_left = self.time_left_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        debug!(mode = ?self.mode, time_left = self.time_left_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Stop and refill the current mode. Mode and count are kept.
    pub fn reset(&mut self) -> Option<Event> {
        self.is_running = false;
        self.time_left_secs = self.total_secs();
        debug!(mode = ?self.mode, "timer reset");
        Some(Event::TimerReset {
            mode: self.mode,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Treat the current interval as completed right now.
    pub fn skip(&mut self) -> Option<Event> {
        self.is_running = false;
        Some(self.complete(true))
    }

    pub fn select_mode(&mut self, mode: TimerMode) -> Option<Event> {
        self.is_running = false;
        self.mode = mode;
        self.time_left_secs = self.total_secs();
        debug!(mode = ?mode, "mode selected");
        Some(Event::ModeSelected {
            mode,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Replace the settings. The current interval is refilled with its new
    /// length, so progress made so far is dropped.
    pub fn update_settings(&mut self, settings: Settings) -> Option<Event> {
        self.settings = settings;
        self.time_left_secs = self.total_secs();
        debug!(mode = ?self.mode, time_left = self.time_left_secs, "settings updated");
        Some(Event::SettingsUpdated {
            mode: self.mode,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Call once per second. Returns `Some(Event::TimerCompleted)` when the
    /// countdown reaches zero. A no-op while paused.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running || self.time_left_secs == 0 {
            return None;
        }
        self.time_left_secs -= 1;
        if self.time_left_secs == 0 {
            return Some(self.complete(false));
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, skipped: bool) -> Event {
        let completed = self.mode;
        self.is_running = false;

        let (next, auto_start) = match completed {
            TimerMode::Pomodoro => {
                self.completed_pomodoros = self.completed_pomodoros.saturating_add(1);
                let every = self.settings.pomodoros_before_long_break.max(1);
                let next = if self.completed_pomodoros % every == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                };
                (next, self.settings.auto_start_breaks)
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                (TimerMode::Pomodoro, self.settings.auto_start_pomodoros)
            }
        };

        self.mode = next;
        self.time_left_secs = self.total_secs();
        self.is_running = auto_start;

        debug!(
            completed = ?completed,
            next = ?next,
            completed_pomodoros = self.completed_pomodoros,
            skipped,
            "interval completed"
        );

        Event::TimerCompleted {
            completed,
            next,
            completed_pomodoros: self.completed_pomodoros,
            auto_started: auto_start,
            skipped,
            play_sound: self.settings.play_sound && !skipped,
            at: Utc::now(),
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
