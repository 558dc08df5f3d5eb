//! User-editable timer settings.
//!
//! The engine trusts whatever [`Settings`] it is given. Range enforcement
//! happens here, at the editing boundary: [`Settings::clamped`] for values
//! coming from configuration and [`Settings::with_value`] for textual edits.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};

pub const POMODORO_TIME_RANGE: RangeInclusive<u32> = 1..=60;
pub const SHORT_BREAK_TIME_RANGE: RangeInclusive<u32> = 1..=15;
pub const LONG_BREAK_TIME_RANGE: RangeInclusive<u32> = 1..=30;
pub const POMODOROS_BEFORE_LONG_BREAK_RANGE: RangeInclusive<u32> = 1..=10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Focus interval length in minutes.
    #[serde(default = "default_pomodoro_time")]
    pub pomodoro_time: u32,
    /// Short break length in minutes.
    #[serde(default = "default_short_break_time")]
    pub short_break_time: u32,
    /// Long break length in minutes.
    #[serde(default = "default_long_break_time")]
    pub long_break_time: u32,
    #[serde(default = "default_pomodoros_before_long_break")]
    pub pomodoros_before_long_break: u32,
    #[serde(default = "default_true")]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_pomodoros: bool,
    #[serde(default = "default_true")]
    pub play_sound: bool,
}

fn default_pomodoro_time() -> u32 {
    25
}
fn default_short_break_time() -> u32 {
    5
}
fn default_long_break_time() -> u32 {
    15
}
fn default_pomodoros_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_time: default_pomodoro_time(),
            short_break_time: default_short_break_time(),
            long_break_time: default_long_break_time(),
            pomodoros_before_long_break: default_pomodoros_before_long_break(),
            auto_start_breaks: true,
            auto_start_pomodoros: false,
            play_sound: true,
        }
    }
}

/// Declared range of a numeric field, or `None` for booleans and unknown keys.
pub fn numeric_range(key: &str) -> Option<RangeInclusive<u32>> {
    match key {
        "pomodoro_time" => Some(POMODORO_TIME_RANGE),
        "short_break_time" => Some(SHORT_BREAK_TIME_RANGE),
        "long_break_time" => Some(LONG_BREAK_TIME_RANGE),
        "pomodoros_before_long_break" => Some(POMODOROS_BEFORE_LONG_BREAK_RANGE),
        _ => None,
    }
}

fn clamp_to(value: u32, range: RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

impl Settings {
    /// Every field name accepted by [`Settings::get`] and [`Settings::with_value`].
    pub const KEYS: [&'static str; 7] = [
        "pomodoro_time",
        "short_break_time",
        "long_break_time",
        "pomodoros_before_long_break",
        "auto_start_breaks",
        "auto_start_pomodoros",
        "play_sound",
    ];

    /// Copy of these settings with every numeric field forced into range.
    pub fn clamped(&self) -> Self {
        Self {
            pomodoro_time: clamp_to(self.pomodoro_time, POMODORO_TIME_RANGE),
            short_break_time: clamp_to(self.short_break_time, SHORT_BREAK_TIME_RANGE),
            long_break_time: clamp_to(self.long_break_time, LONG_BREAK_TIME_RANGE),
            pomodoros_before_long_break: clamp_to(
                self.pomodoros_before_long_break,
                POMODOROS_BEFORE_LONG_BREAK_RANGE,
            ),
            ..self.clone()
        }
    }

    /// Reports the first numeric field that lies outside its range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("pomodoro_time", self.pomodoro_time, POMODORO_TIME_RANGE),
            ("short_break_time", self.short_break_time, SHORT_BREAK_TIME_RANGE),
            ("long_break_time", self.long_break_time, LONG_BREAK_TIME_RANGE),
            (
                "pomodoros_before_long_break",
                self.pomodoros_before_long_break,
                POMODOROS_BEFORE_LONG_BREAK_RANGE,
            ),
        ];
        for (field, value, range) in fields {
            if !range.contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field,
                    value,
                    min: *range.start(),
                    max: *range.end(),
                });
            }
        }
        Ok(())
    }

    /// Get one field as text.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        json.get(key).map(|v| v.to_string())
    }

    /// Apply a textual edit to one field and return the resulting settings.
    ///
    /// Numbers are clamped into range; text that is not a number falls back
    /// to the field minimum.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unknown keys or booleans
    /// that are not `true`/`false`.
    pub fn with_value(&self, key: &str, value: &str) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        let value = value.trim();

        if let Some(range) = numeric_range(key) {
            let parsed = match value.parse::<i64>() {
                Ok(n) => n.clamp(i64::from(*range.start()), i64::from(*range.end())) as u32,
                Err(_) => {
                    tracing::warn!(key, value, "not a number, using minimum");
                    *range.start()
                }
            };
            match key {
                "pomodoro_time" => next.pomodoro_time = parsed,
                "short_break_time" => next.short_break_time = parsed,
                "long_break_time" => next.long_break_time = parsed,
                _ => next.pomodoros_before_long_break = parsed,
            }
            return Ok(next);
        }

        let flag = match key {
            "auto_start_breaks" => &mut next.auto_start_breaks,
            "auto_start_pomodoros" => &mut next.auto_start_pomodoros,
            "play_sound" => &mut next.play_sound,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("unknown setting (expected one of {})", Self::KEYS.join(", ")),
                })
            }
        };
        *flag = value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(next)
    }
}
