use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

/// Every timer state change produces an Event.
/// Front ends print or forward them; the driver uses `TimerCompleted` to
/// fire the completion signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Countdown reached 00:00 and stopped.
    TimerCompleted {
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    DurationChanged {
        minutes: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        minutes: u32,
        seconds: u32,
        remaining_secs: u32,
        display: String,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
