//! # Studydesk Core Library
//!
//! This library provides the core logic for Studydesk, a small study
//! dashboard: a task list with completion streaks, a countdown focus timer,
//! and a session planner. The `studydesk` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Stores**: [`TaskStore`] and [`PlannerStore`] own their lists and
//!   rewrite them to a [`KvStore`] after every change
//! - **Timer Engine**: a tick-driven countdown state machine; the
//!   [`TimerDriver`] feeds it one tick per second over a channel
//! - **Storage**: SQLite or in-memory key-value backends, TOML configuration
//! - **Seams**: ids come from an [`IdSource`], time from a [`Clock`], and
//!   the completion tone from a [`Chime`], so everything runs in tests
//!   without real storage, randomness or audio
//!
//! ## Key Components
//!
//! - [`TaskStore`]: task CRUD, filters and streaks
//! - [`PlannerStore`]: study sessions in chronological order
//! - [`TimerEngine`]: core timer state machine
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod ids;
pub mod input;
pub mod planner;
pub mod signal;
pub mod storage;
pub mod task;
pub mod timer;

pub use clock::{date_key, Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, SignalError, StorageError};
pub use events::Event;
pub use ids::{IdSource, SequentialIds, UuidSource};
pub use input::parse_minutes;
pub use planner::{clamp_session_minutes, PlannerStore, StudySession};
pub use signal::{announce_completion, Chime, SignalOutcome};
pub use storage::{Config, JsonList, KvStore, MemoryStore, SqliteStore};
pub use task::{Task, TaskFilter, TaskStore, TaskSummary};
pub use timer::{RunOutcome, TimerDriver, TimerEngine, TimerMessage, TimerState};
