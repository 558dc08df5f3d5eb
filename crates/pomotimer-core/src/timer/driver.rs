//! Async host for the timer engine.
//!
//! The driver task is the only owner of the [`TimerEngine`]. Commands arrive
//! over an mpsc channel and ticks come from a one-second interval; both go
//! through [`TimerEngine::apply`]. Snapshots are published on a watch channel
//! and events on a broadcast channel.
//!
//! The interval only exists while the engine is running. It is re-armed after
//! a completion or a command that changed the countdown, so each fresh
//! countdown gets a full first second. Commands that leave the countdown as
//! it was (a second `Start`, say) keep the current tick phase.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::engine::{Command, TimerEngine, TimerSnapshot};
use super::mode::TimerMode;
use crate::error::{CoreError, Result};
use crate::events::Event;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// A queued command, optionally asking for the state right after it applied.
#[derive(Debug)]
struct Request {
    command: Command,
    reply: Option<oneshot::Sender<TimerSnapshot>>,
}

/// Cheap handle used by the presentation layer to talk to the driver.
///
/// Dropping every handle closes the command channel and stops the driver.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::Sender<Request>,
    events: broadcast::Sender<Event>,
    snapshot: watch::Receiver<TimerSnapshot>,
}

impl TimerHandle {
    /// Queue a command for the engine.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DriverClosed`] if the driver task has exited.
    pub async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(Request {
                command,
                reply: None,
            })
            .await
            .map_err(|_| CoreError::DriverClosed)
    }

    /// Queue a command and wait until the driver has applied it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DriverClosed`] if the driver task has exited.
    pub async fn apply(&self, command: Command) -> Result<TimerSnapshot> {
        let (reply, applied) = oneshot::channel();
        self.commands
            .send(Request {
                command,
                reply: Some(reply),
            })
            .await
            .map_err(|_| CoreError::DriverClosed)?;
        applied.await.map_err(|_| CoreError::DriverClosed)
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn watch(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot.clone()
    }

    /// Stop accepting commands. The driver exits once all clones are gone.
    pub fn shutdown(self) {
        drop(self);
    }
}

pub struct TimerDriver {
    engine: TimerEngine,
    commands: mpsc::Receiver<Request>,
    events: broadcast::Sender<Event>,
    snapshot: watch::Sender<TimerSnapshot>,
}

impl TimerDriver {
    /// Spawn the driver on the current tokio runtime.
    ///
    /// The join handle resolves to the final engine state once every
    /// [`TimerHandle`] has been dropped.
    pub fn spawn(engine: TimerEngine) -> (TimerHandle, JoinHandle<TimerEngine>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        let driver = TimerDriver {
            engine,
            commands: command_rx,
            events: event_tx.clone(),
            snapshot: snapshot_tx,
        };
        let task = tokio::spawn(driver.run());

        let handle = TimerHandle {
            commands: command_tx,
            events: event_tx,
            snapshot: snapshot_rx,
        };
        (handle, task)
    }

    async fn run(mut self) -> TimerEngine {
        'driver: loop {
            if !self.engine.is_running() {
                match self.commands.recv().await {
                    Some(request) => self.handle(request),
                    None => break 'driver,
                }
                continue;
            }

            let mut ticker = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!("ticker acquired");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let completed = self.engine.apply(Command::Tick);
                        self.publish_snapshot();
                        if let Some(event) = completed {
                            self.publish(event);
                            break;
                        }
                    }
                    request = self.commands.recv() => {
                        let Some(request) = request else {
                            break 'driver;
                        };
                        let before = self.countdown();
                        self.handle(request);
                        if self.countdown() != before {
                            break;
                        }
                    }
                }
            }

            debug!("ticker released");
        }

        debug!("timer driver stopped");
        self.engine
    }

    /// The part of the state the ticker phase depends on.
    fn countdown(&self) -> (TimerMode, u64, bool) {
        (
            self.engine.mode(),
            self.engine.time_left_secs(),
            self.engine.is_running(),
        )
    }

    fn handle(&mut self, request: Request) {
        debug!(command = ?request.command, "applying command");
        let event = self.engine.apply(request.command);
        self.publish_snapshot();
        if let Some(event) = event {
            self.publish(event);
        }
        if let Some(reply) = request.reply {
            // The caller may have stopped waiting.
            let _ = reply.send(self.engine.snapshot());
        }
    }

    fn publish_snapshot(&self) {
        self.snapshot.send_replace(self.engine.snapshot());
    }

    fn publish(&self, event: Event) {
        if let Event::TimerCompleted {
            completed, next, ..
        } = &event
        {
            info!(completed = ?completed, next = ?next, "interval completed");
        }
        // No subscribers is fine; snapshots still flow through the watch channel.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{Settings, TimerMode};

    #[tokio::test(start_paused = true)]
    async fn commands_update_snapshot() {
        let (handle, _task) = TimerDriver::spawn(TimerEngine::default());
        let mut events = handle.subscribe();

        handle
            .send(Command::SelectMode {
                mode: TimerMode::LongBreak,
            })
            .await
            .unwrap();

        let event = events.recv().await.unwrap();
        assert!(matches!(event, Event::ModeSelected { .. }));
        let snap = handle.snapshot();
        assert_eq!(snap.mode, TimerMode::LongBreak);
        assert_eq!(snap.time_left_secs, 15 * 60);
    }

    #[tokio::test(start_paused = true)]
    async fn apply_returns_state_after_command() {
        let (handle, _task) = TimerDriver::spawn(TimerEngine::default());
        let snap = handle.apply(Command::Start).await.unwrap();
        assert!(snap.is_running);
        assert_eq!(snap.time_left_secs, 25 * 60);

        let snap = handle.apply(Command::Reset).await.unwrap();
        assert!(!snap.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_driver() {
        let settings = Settings {
            auto_start_breaks: false,
            ..Settings::default()
        };
        let (handle, task) = TimerDriver::spawn(TimerEngine::new(settings));
        handle.send(Command::Skip).await.unwrap();
        handle.shutdown();

        let engine = task.await.unwrap();
        assert_eq!(engine.mode(), TimerMode::ShortBreak);
        assert_eq!(engine.completed_pomodoros(), 1);
    }
}
