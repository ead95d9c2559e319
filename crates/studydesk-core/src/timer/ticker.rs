//! Periodic tick source.
//!
//! A [`Ticker`] is a tokio task that posts [`TimerMessage::Tick`] into a
//! channel once per period. The returned [`TickHandle`] stops it; dropping
//! the handle stops it too, so a forgotten handle cannot keep ticking.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Messages consumed by the timer driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMessage {
    Tick,
    Start,
    Pause,
    Reset,
    SetDuration(i64),
    Shutdown,
}

pub struct Ticker;

impl Ticker {
    /// Spawn a tick loop. The first tick arrives one `period` from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(period: Duration, tx: UnboundedSender<TimerMessage>) -> TickHandle {
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(TimerMessage::Tick).is_err() {
                    break;
                }
            }
        });
        TickHandle { task }
    }
}

/// Cancels its tick loop when cancelled or dropped.
#[derive(Debug)]
pub struct TickHandle {
    task: JoinHandle<()>,
}

impl TickHandle {
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
