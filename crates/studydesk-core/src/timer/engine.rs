//! Countdown timer engine.
//!
//! The engine is a plain state machine. It does not use internal threads or
//! read the clock - the caller delivers one `tick()` per second, normally via
//! [`TimerDriver`](super::TimerDriver).
//!
//! ## State Transitions
//!
//! ```text
//! Paused --start--> Running --pause--> Paused
//! Running --tick reaching 00:00--> Paused (TimerCompleted)
//! any --reset--> Paused at 25:00
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.start();
//! // Once per second:
//! if let Some(Event::TimerCompleted { .. }) = engine.tick() { /* chime */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::input::{clamp_minutes, parse_minutes};

pub const DEFAULT_MINUTES: u32 = 25;
pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 180;

const DEFAULT_TOTAL_SECS: u32 = DEFAULT_MINUTES * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Not counting down, either fresh or paused.
    Paused,
    Running,
}

/// Core timer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    minutes: u32,
    seconds: u32,
    #[serde(default)]
    running: bool,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    /// A stopped timer at 25:00.
    pub fn new() -> Self {
        Self {
            minutes: DEFAULT_MINUTES,
            seconds: 0,
            running: false,
        }
    }

    /// A stopped timer at an arbitrary remaining time.
    ///
    /// Minutes are capped at `MAX_MINUTES` and seconds at 59.
    pub fn with_remaining(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes.min(MAX_MINUTES),
            seconds: seconds.min(59),
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> TimerState {
        if self.running {
            TimerState::Running
        } else {
            TimerState::Paused
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }

    /// Elapsed fraction measured against the 25 minute default, whatever
    /// duration is configured. Negative when more than 25 minutes remain.
    pub fn progress(&self) -> f64 {
        1.0 - f64::from(self.total_seconds()) / f64::from(DEFAULT_TOTAL_SECS)
    }

    /// `progress()` as a percentage in `0.0 ..= 100.0`.
    pub fn progress_pct(&self) -> f64 {
        (self.progress() * 100.0).clamp(0.0, 100.0)
    }

    /// `MM:SS`.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            minutes: self.minutes,
            seconds: self.seconds,
            remaining_secs: self.total_seconds(),
            display: self.display(),
            progress_pct: self.progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. No-op when already running or at 00:00.
    pub fn start(&mut self) -> Option<Event> {
        if self.running || self.total_seconds() == 0 {
            return None;
        }
        self.running = true;
        Some(Event::TimerStarted {
            remaining_secs: self.total_seconds(),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            remaining_secs: self.total_seconds(),
            at: Utc::now(),
        })
    }

    /// Start when paused, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stop and go back to 25:00.
    pub fn reset(&mut self) -> Event {
        *self = Self::new();
        Event::TimerReset { at: Utc::now() }
    }

    /// Set the countdown minutes, clamped to `[1, 180]`.
    ///
    /// While paused the countdown becomes `minutes`:00. While running only
    /// the minutes change; the seconds keep counting and the next tick
    /// continues from the new value.
    pub fn set_duration(&mut self, minutes: i64) -> Option<Event> {
        self.minutes = clamp_minutes(minutes, MIN_MINUTES, MAX_MINUTES);
        if !self.running {
            self.seconds = 0;
        }
        Some(Event::DurationChanged {
            minutes: self.minutes,
            at: Utc::now(),
        })
    }

    /// `set_duration` for raw text input; non-numeric text counts as 0.
    pub fn set_duration_input(&mut self, input: &str) -> Option<Event> {
        self.set_duration(parse_minutes(input))
    }

    /// Advance one second. Returns `Some(Event::TimerCompleted)` on the tick
    /// that reaches 00:00.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        }

        if self.total_seconds() == 0 {
            self.running = false;
            self.minutes = 0;
            self.seconds = 0;
            tracing::info!("focus countdown completed");
            return Some(Event::TimerCompleted { at: Utc::now() });
        }
        None
    }
}
