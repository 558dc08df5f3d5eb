//! Line-oriented terminal front end for a running timer.
//!
//! Parses what the user types into engine commands and renders the engine's
//! snapshots and events back as text (or JSON lines with `--json`).

use pomotimer_core::timer::clock::format_clock;
use pomotimer_core::timer::MAX_PLAN_LEN;
use pomotimer_core::{Command, Event, TimerMode, TimerSnapshot};

pub const HELP: &str = "\
commands:
  start                 start or resume the countdown
  pause                 pause the countdown
  reset                 refill the current interval
  skip                  finish the current interval now
  mode <pomodoro|short|long>
                        switch interval kind
  set <key> <value>     change a setting (see `settings` for keys)
  settings              show current settings
  status                show the timer
  plan [n]              preview the next n intervals (default 8)
  help                  show this help
  quit                  leave the session";

const DEFAULT_PLAN_LEN: usize = 8;

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Set { key: String, value: String },
    Settings,
    Status,
    Plan(usize),
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Input::Empty);
    };

    let input = match verb.to_ascii_lowercase().as_str() {
        "start" | "resume" => Input::Command(Command::Start),
        "pause" => Input::Command(Command::Pause),
        "reset" => Input::Command(Command::Reset),
        "skip" => Input::Command(Command::Skip),
        "mode" => {
            let name = words.next().ok_or("usage: mode <pomodoro|short|long>")?;
            let mode = name.parse::<TimerMode>().map_err(|e| e.to_string())?;
            Input::Command(Command::SelectMode { mode })
        }
        "set" => {
            let (Some(key), Some(value)) = (words.next(), words.next()) else {
                return Err("usage: set <key> <value>".into());
            };
            Input::Set {
                key: key.to_string(),
                value: value.to_string(),
            }
        }
        "settings" => Input::Settings,
        "status" => Input::Status,
        "plan" => match words.next() {
            Some(n) => Input::Plan(parse_plan_len(n)?),
            None => Input::Plan(DEFAULT_PLAN_LEN),
        },
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(format!("unknown command '{other}' (try `help`)")),
    };

    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument '{extra}'"));
    }
    Ok(input)
}

fn parse_plan_len(text: &str) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(n) if (1..=MAX_PLAN_LEN).contains(&n) => Ok(n),
        _ => Err(format!("not a count between 1 and {MAX_PLAN_LEN}: {text}")),
    }
}

/// One-line timer face. `pulsing` marks a just-finished interval.
pub fn render_status(snap: &TimerSnapshot, pulsing: bool) -> String {
    let state = if snap.is_running { "running" } else { "paused" };
    let marker = if pulsing { " <<" } else { "" };
    format!(
        "[{}] {} {} | pomodoros: {} | {:.0}%{}",
        snap.mode,
        format_clock(snap.time_left_secs),
        state,
        snap.completed_pomodoros,
        snap.progress * 100.0,
        marker,
    )
}

/// Human-readable line for an event, if it deserves one.
pub fn render_event(event: &Event) -> Option<String> {
    match event {
        Event::TimerStarted {
            mode,
            time_left_secs,
            ..
        } => Some(format!("{mode} started ({})", format_clock(*time_left_secs))),
        Event::TimerPaused {
            mode,
            time_left_secs,
            ..
        } => Some(format!("{mode} paused at {}", format_clock(*time_left_secs))),
        Event::TimerReset {
            mode,
            time_left_secs,
            ..
        } => Some(format!("{mode} reset to {}", format_clock(*time_left_secs))),
        Event::ModeSelected {
            mode,
            time_left_secs,
            ..
        } => Some(format!("switched to {mode} ({})", format_clock(*time_left_secs))),
        Event::SettingsUpdated {
            mode,
            time_left_secs,
            ..
        } => Some(format!(
            "settings saved; {mode} now {}",
            format_clock(*time_left_secs)
        )),
        Event::TimerCompleted {
            completed,
            next,
            completed_pomodoros,
            auto_started,
            skipped,
            ..
        } => {
            let how = if *skipped { "skipped" } else { "complete" };
            let then = if *auto_started { "started" } else { "ready" };
            Some(format!(
                "*** {completed} {how} *** pomodoros: {completed_pomodoros} | {next} {then}"
            ))
        }
        Event::StateSnapshot { snapshot, .. } => Some(render_status(snapshot, false)),
    }
}
