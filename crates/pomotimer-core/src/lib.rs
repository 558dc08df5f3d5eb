//! # Pomotimer Core Library
//!
//! This library provides the core logic for the Pomotimer Pomodoro timer.
//! All behaviour lives here; the `pomotimer` CLI is a thin terminal layer
//! over the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine cycling through focus,
//!   short break and long break intervals
//! - **Driver**: A tokio task that owns the engine and feeds it one tick per
//!   second while running
//! - **Events**: Notifications returned by the engine for the presentation
//!   layer (alarm cue, completion pulse)
//! - **Storage**: Read-only TOML startup configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerDriver`]: Async host for the engine
//! - [`Settings`]: User-editable durations and auto-start flags
//! - [`Config`]: Application configuration

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use storage::Config;
pub use timer::{
    Command, PlannedInterval, Settings, TimerDriver, TimerEngine, TimerHandle, TimerMode,
    TimerSnapshot,
};
