//! Message-driven timer loop.
//!
//! [`TimerDriver`] is the single owner of a [`TimerEngine`]. Ticks and user
//! commands arrive on one channel and are applied in order, so the engine is
//! only ever mutated here. A tick loop is armed while the engine runs and
//! cancelled on pause, reset, completion and shutdown.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::engine::TimerEngine;
use super::ticker::{TickHandle, Ticker, TimerMessage};
use crate::events::Event;
use crate::signal::{announce_completion, Chime, DEFAULT_ALERT_MESSAGE};

/// Why [`TimerDriver::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Shutdown,
}

pub struct TimerDriver<C> {
    engine: TimerEngine,
    period: Duration,
    tx: UnboundedSender<TimerMessage>,
    rx: UnboundedReceiver<TimerMessage>,
    ticker: Option<TickHandle>,
    chime: C,
    alert_message: String,
}

impl<C: Chime> TimerDriver<C> {
    pub fn new(engine: TimerEngine, period: Duration, chime: C) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            engine,
            period,
            tx,
            rx,
            ticker: None,
            chime,
            alert_message: DEFAULT_ALERT_MESSAGE.to_string(),
        }
    }

    pub fn with_alert_message(mut self, message: impl Into<String>) -> Self {
        self.alert_message = message.into();
        self
    }

    /// A handle for posting commands from elsewhere (signal handlers, UI).
    pub fn sender(&self) -> UnboundedSender<TimerMessage> {
        self.tx.clone()
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn chime(&self) -> &C {
        &self.chime
    }

    pub fn is_armed(&self) -> bool {
        self.ticker.is_some()
    }

    /// Apply one message to the engine.
    ///
    /// Must be called from within a tokio runtime, since `Start` spawns the
    /// tick loop.
    pub fn handle(&mut self, msg: TimerMessage) -> Option<Event> {
        match msg {
            TimerMessage::Tick => {
                let event = self.engine.tick();
                if event.as_ref().is_some_and(Event::is_completion) {
                    self.disarm();
                    let outcome = announce_completion(&self.chime, &self.alert_message);
                    tracing::debug!(?outcome, "announced completion");
                }
                event
            }
            TimerMessage::Start => {
                let event = self.engine.start();
                if event.is_some() {
                    self.arm();
                }
                event
            }
            TimerMessage::Pause => {
                self.disarm();
                self.engine.pause()
            }
            TimerMessage::Reset => {
                self.disarm();
                Some(self.engine.reset())
            }
            TimerMessage::SetDuration(minutes) => self.engine.set_duration(minutes),
            TimerMessage::Shutdown => {
                self.shutdown();
                None
            }
        }
    }

    /// Apply every message already queued, without waiting.
    pub fn pump(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            events.extend(self.handle(msg));
        }
        events
    }

    /// Process messages until the countdown completes or a `Shutdown`
    /// arrives. `on_update` runs after every message with the engine state
    /// and the event it produced, if any.
    pub async fn run(
        &mut self,
        mut on_update: impl FnMut(&TimerEngine, Option<&Event>),
    ) -> RunOutcome {
        while let Some(msg) = self.rx.recv().await {
            let shutdown = msg == TimerMessage::Shutdown;
            let event = self.handle(msg);
            on_update(&self.engine, event.as_ref());
            if event.as_ref().is_some_and(Event::is_completion) {
                return RunOutcome::Completed;
            }
            if shutdown {
                return RunOutcome::Shutdown;
            }
        }
        RunOutcome::Shutdown
    }

    /// Stop ticking. The engine keeps its current state.
    pub fn shutdown(&mut self) {
        self.disarm();
        self.engine.pause();
    }

    fn arm(&mut self) {
        // Replacing the handle drops, and so cancels, any previous loop.
        self.ticker = Some(Ticker::spawn(self.period, self.tx.clone()));
    }

    fn disarm(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}
