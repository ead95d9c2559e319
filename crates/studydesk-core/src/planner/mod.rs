//! Study session planner.
//!
//! Sessions are stored newest-first and listed chronologically. They are
//! never edited after creation.

use std::rc::Rc;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{date_key, Clock, SystemClock};
use crate::ids::{IdSource, UuidSource};
use crate::input::clamp_minutes;
use crate::storage::{JsonList, KvStore, SESSIONS_KEY};

pub const MIN_SESSION_MINUTES: u32 = 15;
pub const MAX_SESSION_MINUTES: u32 = 300;
/// Form default for a new session.
pub const DEFAULT_SESSION_MINUTES: u32 = 60;

/// A planned block of study time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Minutes, within `[MIN_SESSION_MINUTES, MAX_SESSION_MINUTES]`.
    pub duration: u32,
}

pub fn clamp_session_minutes(minutes: i64) -> u32 {
    clamp_minutes(minutes, MIN_SESSION_MINUTES, MAX_SESSION_MINUTES)
}

/// Combine a `YYYY-MM-DD` date and an `HH:MM[:SS]` time in local time.
///
/// Returns `None` for malformed input or a local time skipped by a DST jump.
pub fn local_start(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = time.trim();
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;
    NaiveDateTime::new(date, time)
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Owns the session list and keeps it mirrored to storage.
pub struct PlannerStore<S> {
    sessions: Vec<StudySession>,
    list: JsonList<S>,
    ids: Box<dyn IdSource>,
    clock: Rc<dyn Clock>,
}

impl<S: KvStore> PlannerStore<S> {
    pub fn open(kv: S) -> Self {
        Self::with_parts(kv, Box::new(UuidSource), Rc::new(SystemClock))
    }

    pub fn with_parts(kv: S, ids: Box<dyn IdSource>, clock: Rc<dyn Clock>) -> Self {
        let list = JsonList::new(kv, SESSIONS_KEY);
        let sessions: Vec<StudySession> = list.load();
        tracing::debug!(count = sessions.len(), "loaded sessions");
        Self {
            sessions,
            list,
            ids,
            clock,
        }
    }

    /// Sessions in insertion order, newest first.
    pub fn sessions(&self) -> &[StudySession] {
        &self.sessions
    }

    /// Plan a session starting at `date` + `time` local time.
    ///
    /// Returns `None` when the title, date or time is blank or unparseable.
    /// `duration_minutes` is clamped into the allowed range.
    pub fn add_session(
        &mut self,
        title: &str,
        date: &str,
        time: &str,
        duration_minutes: i64,
    ) -> Option<&StudySession> {
        let title = title.trim();
        if title.is_empty() || date.trim().is_empty() || time.trim().is_empty() {
            tracing::debug!("ignoring incomplete session");
            return None;
        }
        let Some(start) = local_start(date, time) else {
            tracing::debug!(date, time, "ignoring session with invalid start");
            return None;
        };
        let duration = clamp_session_minutes(duration_minutes);

        let session = StudySession {
            id: self.ids.next_id(),
            title: title.to_string(),
            start,
            end: start + Duration::minutes(i64::from(duration)),
            duration,
        };
        tracing::debug!(id = %session.id, duration, "added session");
        self.sessions.insert(0, session);
        self.persist();
        self.sessions.first()
    }

    /// Every session, earliest start first. Past sessions are included.
    pub fn list_upcoming(&self) -> Vec<&StudySession> {
        let mut sorted: Vec<&StudySession> = self.sessions.iter().collect();
        sorted.sort_by_key(|s| s.start);
        sorted
    }

    /// Whether `at` falls on today's local date.
    pub fn is_today(&self, at: &DateTime<Utc>) -> bool {
        date_key(at) == self.clock.today()
    }

    fn persist(&self) {
        if let Err(e) = self.list.save(&self.sessions) {
            tracing::warn!(error = %e, "failed to save sessions");
        }
    }
}
