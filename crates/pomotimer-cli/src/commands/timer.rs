use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::Subcommand;
use pomotimer_core::events::COMPLETION_PULSE_SECS;
use pomotimer_core::timer::{upcoming, MAX_PLAN_LEN};
use pomotimer_core::{Command, Config, Event, Settings, TimerDriver, TimerEngine, TimerSnapshot};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::session::{self, Input};

const BELL: &str = "\x07";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run an interactive timer session reading commands from stdin
    Run {
        /// Start the first pomodoro immediately
        #[arg(long)]
        start: bool,
        /// Print events and status as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Print the upcoming intervals as JSON
    Plan {
        /// Number of intervals to show
        #[arg(
            long,
            default_value = "8",
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_PLAN_LEN as u64)
        )]
        count: usize,
    },
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { start, json } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_session(config.timer.clone(), start, json))
        }
        TimerAction::Plan { count } => {
            let engine = TimerEngine::new(config.timer.clone());
            let plan = upcoming(&engine, count);
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
    }
}

/// Prints events as they arrive and remembers when the last completion
/// pulse should stop showing.
struct Output {
    json: bool,
    state: watch::Receiver<TimerSnapshot>,
    pulse_until: Option<Instant>,
}

impl Output {
    fn event(&mut self, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
            return Ok(());
        }
        if let Some(line) = session::render_event(event) {
            println!("{line}");
        }
        if let Event::TimerCompleted { play_sound, .. } = event {
            self.pulse_until = Some(Instant::now() + Duration::from_secs(COMPLETION_PULSE_SECS));
            if *play_sound {
                print!("{BELL}");
            }
            self.status()?;
        }
        Ok(())
    }

    fn status(&self) -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = self.state.borrow().clone();
        if self.json {
            let event = Event::StateSnapshot {
                snapshot,
                at: chrono::Utc::now(),
            };
            println!("{}", serde_json::to_string(&event)?);
        } else {
            let pulsing = self.pulse_until.is_some_and(|until| Instant::now() < until);
            println!("{}", session::render_status(&snapshot, pulsing));
        }
        Ok(())
    }

    fn message(&self, text: &str) {
        if !self.json {
            println!("{text}");
        }
    }
}

async fn run_session(
    mut settings: Settings,
    start: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (handle, task) = TimerDriver::spawn(TimerEngine::new(settings.clone()));
    let mut events = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = Output {
        json,
        state: handle.watch(),
        pulse_until: None,
    };

    tracing::info!("session started");
    out.status()?;
    if start {
        handle.apply(Command::Start).await?;
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match session::parse_line(&line) {
                    Ok(Input::Command(command)) => {
                        handle.apply(command).await?;
                    }
                    Ok(Input::Set { key, value }) => match settings.with_value(&key, &value) {
                        Ok(edited) => {
                            settings = edited;
                            handle
                                .apply(Command::UpdateSettings {
                                    settings: settings.clone(),
                                })
                                .await?;
                        }
                        Err(e) => eprintln!("error: {e}"),
                    },
                    Ok(Input::Settings) => {
                        println!("{}", serde_json::to_string_pretty(&settings)?);
                    }
                    Ok(Input::Status) => out.status()?,
                    Ok(Input::Plan(count)) => {
                        let engine = TimerEngine::restore(settings.clone(), &handle.snapshot());
                        println!("{}", serde_json::to_string_pretty(&upcoming(&engine, count))?);
                    }
                    Ok(Input::Help) => out.message(session::HELP),
                    Ok(Input::Quit) => break,
                    Ok(Input::Empty) => {}
                    Err(e) => eprintln!("error: {e}"),
                }
                // Show what the command caused before reading the next line.
                while let Ok(event) = events.try_recv() {
                    out.event(&event)?;
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => out.event(&event)?,
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "event output fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    handle.shutdown();
    let engine = task.await?;

    // Everything the driver published before it stopped.
    while let Ok(event) = events.try_recv() {
        out.event(&event)?;
    }

    tracing::info!(
        completed_pomodoros = engine.completed_pomodoros(),
        "session ended"
    );
    Ok(())
}
