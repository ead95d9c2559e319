mod driver;
mod engine;
mod ticker;

pub use driver::{RunOutcome, TimerDriver};
pub use engine::{TimerEngine, TimerState, DEFAULT_MINUTES, MAX_MINUTES, MIN_MINUTES};
pub use ticker::{TickHandle, Ticker, TimerMessage};
