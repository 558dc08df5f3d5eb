//! Integration tests for the async timer driver.
//!
//! All tests run on tokio's paused clock, so a full minute of ticking
//! finishes instantly while still going through the real interval.

use std::time::Duration;

use pomotimer_core::{Command, Event, Settings, TimerDriver, TimerEngine, TimerMode};
use tokio::sync::broadcast;
use tokio::time::{self, Instant};

fn one_minute_manual() -> Settings {
    Settings {
        pomodoro_time: 1,
        short_break_time: 1,
        long_break_time: 1,
        auto_start_breaks: false,
        auto_start_pomodoros: false,
        ..Settings::default()
    }
}

async fn next_completion(events: &mut broadcast::Receiver<Event>) -> Event {
    loop {
        let event = events.recv().await.expect("driver closed");
        if event.is_completion() {
            return event;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn pomodoro_completes_after_sixty_ticks() {
    let (handle, _task) = TimerDriver::spawn(TimerEngine::new(one_minute_manual()));
    let mut events = handle.subscribe();

    let started = Instant::now();
    handle.send(Command::Start).await.unwrap();
    let event = next_completion(&mut events).await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(60), "finished after {elapsed:?}");
    assert!(elapsed < Duration::from_secs(61), "finished after {elapsed:?}");

    match event {
        Event::TimerCompleted {
            completed,
            next,
            completed_pomodoros,
            auto_started,
            skipped,
            play_sound,
            ..
        } => {
            assert_eq!(completed, TimerMode::Pomodoro);
            assert_eq!(next, TimerMode::ShortBreak);
            assert_eq!(completed_pomodoros, 1);
            assert!(!auto_started);
            assert!(!skipped);
            assert!(play_sound);
        }
        other => panic!("Expected TimerCompleted, got {other:?}"),
    }

    let snap = handle.snapshot();
    assert_eq!(snap.mode, TimerMode::ShortBreak);
    assert_eq!(snap.time_left_secs, 60);
    assert!(!snap.is_running);
}

#[tokio::test(start_paused = true)]
async fn pause_releases_the_ticker() {
    let (handle, _task) = TimerDriver::spawn(TimerEngine::new(one_minute_manual()));
    let mut events = handle.subscribe();

    handle.send(Command::Start).await.unwrap();
    time::sleep(Duration::from_millis(10_500)).await;
    handle.send(Command::Pause).await.unwrap();

    loop {
        if let Event::TimerPaused { time_left_secs, .. } = events.recv().await.unwrap() {
            assert_eq!(time_left_secs, 50);
            break;
        }
    }

    time::sleep(Duration::from_secs(30)).await;
    let snap = handle.snapshot();
    assert_eq!(snap.time_left_secs, 50);
    assert!(!snap.is_running);
}

#[tokio::test(start_paused = true)]
async fn auto_started_break_keeps_ticking() {
    let settings = Settings {
        auto_start_breaks: true,
        ..one_minute_manual()
    };
    let (handle, _task) = TimerDriver::spawn(TimerEngine::new(settings));
    let mut events = handle.subscribe();

    handle.send(Command::Start).await.unwrap();
    let first = next_completion(&mut events).await;
    assert!(matches!(
        first,
        Event::TimerCompleted {
            auto_started: true,
            ..
        }
    ));

    let second = next_completion(&mut events).await;
    match second {
        Event::TimerCompleted {
            completed, next, ..
        } => {
            assert_eq!(completed, TimerMode::ShortBreak);
            assert_eq!(next, TimerMode::Pomodoro);
        }
        other => panic!("Expected TimerCompleted, got {other:?}"),
    }
    assert!(!handle.snapshot().is_running);
}

#[tokio::test(start_paused = true)]
async fn repeated_start_keeps_tick_phase() {
    let (handle, _task) = TimerDriver::spawn(TimerEngine::default());

    handle.apply(Command::Start).await.unwrap();
    for _ in 0..10 {
        time::sleep(Duration::from_millis(900)).await;
        handle.apply(Command::Start).await.unwrap();
    }
    time::sleep(Duration::from_millis(10)).await;

    let snap = handle.snapshot();
    assert!(snap.is_running);
    assert_eq!(snap.time_left_secs, 25 * 60 - 9);
}

#[tokio::test(start_paused = true)]
async fn settings_update_while_running_refills_and_keeps_running() {
    let (handle, _task) = TimerDriver::spawn(TimerEngine::new(one_minute_manual()));
    let mut watch = handle.watch();

    handle.send(Command::Start).await.unwrap();
    time::sleep(Duration::from_millis(5_500)).await;

    let longer = Settings {
        pomodoro_time: 2,
        ..one_minute_manual()
    };
    handle
        .send(Command::UpdateSettings { settings: longer })
        .await
        .unwrap();

    watch
        .wait_for(|snap| snap.total_secs == 120)
        .await
        .unwrap();
    let snap = handle.snapshot();
    assert_eq!(snap.time_left_secs, 120);
    assert!(snap.is_running);
}

#[tokio::test(start_paused = true)]
async fn send_after_driver_exit_fails() {
    let (handle, task) = TimerDriver::spawn(TimerEngine::default());
    let spare = handle.clone();
    task.abort();
    let _ = task.await;

    assert!(spare.send(Command::Start).await.is_err());
    drop(handle);
}
