use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::settings::Settings;

/// The kind of interval the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    /// Full length of this mode in seconds under `settings`.
    pub fn duration_secs(self, settings: &Settings) -> u64 {
        let minutes = match self {
            TimerMode::Pomodoro => settings.pomodoro_time,
            TimerMode::ShortBreak => settings.short_break_time,
            TimerMode::LongBreak => settings.long_break_time,
        };
        u64::from(minutes).saturating_mul(60)
    }

    /// Human label shown on the timer face.
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Pomodoro => "Focus Time",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a mode name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown mode '{}' (expected pomodoro, short or long)",
            self.0
        )
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for TimerMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pomodoro" | "focus" | "work" => Ok(TimerMode::Pomodoro),
            "short" | "short_break" | "shortbreak" => Ok(TimerMode::ShortBreak),
            "long" | "long_break" | "longbreak" => Ok(TimerMode::LongBreak),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}
