//! Task list with completion tracking.
//!
//! Tasks are kept newest-first. Every mutation rewrites the whole list to the
//! backing store under [`TASKS_KEY`].

mod streak;

pub use streak::{completion_days, current_streak, streak_label};

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::ids::{IdSource, UuidSource};
use crate::storage::{JsonList, KvStore, TASKS_KEY};

/// A to-do item.
///
/// `completed_at` is set exactly when `done` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    fn toggle(&mut self, now: DateTime<Utc>) {
        self.done = !self.done;
        self.completed_at = if self.done { Some(now) } else { None };
    }

    /// Restore `completed_at ⇔ done` on a loaded record. A done task with no
    /// timestamp is taken to have been completed when it was created.
    fn normalize(&mut self) -> bool {
        match (self.done, self.completed_at) {
            (true, None) => self.completed_at = Some(self.created_at),
            (false, Some(_)) => self.completed_at = None,
            _ => return false,
        }
        true
    }
}

/// Read-side views over the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Done,
    DueToday,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.done,
            TaskFilter::Done => task.done,
            TaskFilter::DueToday => task.due == Some(today),
        }
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "done" => Ok(TaskFilter::Done),
            "today" | "due-today" | "due_today" => Ok(TaskFilter::DueToday),
            other => Err(format!(
                "unknown filter '{other}' (expected all, active, done or today)"
            )),
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Done => "done",
            TaskFilter::DueToday => "today",
        };
        f.write_str(name)
    }
}

/// Counts shown in the task header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub active: usize,
    pub done: usize,
    pub streak: u32,
}

/// Owns the task list and keeps it mirrored to storage.
pub struct TaskStore<S> {
    tasks: Vec<Task>,
    list: JsonList<S>,
    ids: Box<dyn IdSource>,
    clock: Rc<dyn Clock>,
}

impl<S: KvStore> TaskStore<S> {
    /// Load tasks from `kv` using random ids and the system clock.
    pub fn open(kv: S) -> Self {
        Self::with_parts(kv, Box::new(UuidSource), Rc::new(SystemClock))
    }

    pub fn with_parts(kv: S, ids: Box<dyn IdSource>, clock: Rc<dyn Clock>) -> Self {
        let list = JsonList::new(kv, TASKS_KEY);
        let mut tasks: Vec<Task> = list.load();
        let mut repaired = 0;
        for task in &mut tasks {
            if task.normalize() {
                repaired += 1;
            }
        }
        if repaired > 0 {
            tracing::warn!(repaired, "repaired completion timestamps on loaded tasks");
        }
        tracing::debug!(count = tasks.len(), "loaded tasks");
        Self {
            tasks,
            list,
            ids,
            clock,
        }
    }

    /// All tasks, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Create a task and put it at the front of the list.
    ///
    /// Returns `None` without touching the list when the title is blank.
    pub fn add_task(
        &mut self,
        title: &str,
        subject: Option<&str>,
        due: Option<NaiveDate>,
    ) -> Option<&Task> {
        let title = title.trim();
        if title.is_empty() {
            tracing::debug!("ignoring task with blank title");
            return None;
        }
        let subject = subject
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let task = Task {
            id: self.ids.next_id(),
            title: title.to_string(),
            subject,
            due,
            done: false,
            created_at: self.clock.now().with_timezone(&Utc),
            completed_at: None,
        };
        tracing::debug!(id = %task.id, "added task");
        self.tasks.insert(0, task);
        self.persist();
        self.tasks.first()
    }

    /// Flip a task between done and not done.
    pub fn toggle_task(&mut self, id: &str) -> Option<&Task> {
        let now = self.clock.now().with_timezone(&Utc);
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        self.tasks[idx].toggle(now);
        tracing::debug!(id, done = self.tasks[idx].done, "toggled task");
        self.persist();
        self.tasks.get(idx)
    }

    pub fn remove_task(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(idx);
        tracing::debug!(id, "removed task");
        self.persist();
        Some(removed)
    }

    pub fn filter(&self, filter: TaskFilter) -> Vec<&Task> {
        let today = self.clock.today();
        self.tasks
            .iter()
            .filter(|t| filter.matches(t, today))
            .collect()
    }

    /// Consecutive completion days ending today.
    pub fn streak(&self) -> u32 {
        current_streak(&completion_days(&self.tasks), self.clock.today())
    }

    pub fn summary(&self) -> TaskSummary {
        let done = self.tasks.iter().filter(|t| t.done).count();
        TaskSummary {
            total: self.tasks.len(),
            active: self.tasks.len() - done,
            done,
            streak: self.streak(),
        }
    }

    fn persist(&self) {
        if let Err(e) = self.list.save(&self.tasks) {
            tracing::warn!(error = %e, "failed to save tasks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::ids::SequentialIds;
    use crate::storage::MemoryStore;
    use chrono::{Duration, Local, TimeZone};

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn store_at(kv: &MemoryStore, now: DateTime<Local>) -> (TaskStore<&MemoryStore>, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(now));
        let store = TaskStore::with_parts(kv, Box::new(SequentialIds::new("t")), clock.clone());
        (store, clock)
    }

    #[test]
    fn add_prepends_and_trims() {
        let kv = MemoryStore::new();
        let (mut store, _) = store_at(&kv, noon(2024, 3, 5));
        store.add_task("first", None, None);
        let task = store.add_task("  Revise Algebra  ", Some("  Math "), None).unwrap();
        assert_eq!(task.title, "Revise Algebra");
        assert_eq!(task.subject.as_deref(), Some("Math"));
        assert!(!task.done);
        assert!(task.completed_at.is_none());
        assert_eq!(store.tasks()[0].id, "t-2");
        assert_eq!(store.tasks()[1].id, "t-1");
    }

    #[test]
    fn blank_title_is_ignored() {
        let kv = MemoryStore::new();
        let (mut store, _) = store_at(&kv, noon(2024, 3, 5));
        assert!(store.add_task("   ", Some("Math"), None).is_none());
        assert!(store.tasks().is_empty());
        assert!(kv.raw(TASKS_KEY).is_none());
    }

    #[test]
    fn empty_subject_is_absent() {
        let kv = MemoryStore::new();
        let (mut store, _) = store_at(&kv, noon(2024, 3, 5));
        let task = store.add_task("Read", Some("   "), None).unwrap();
        assert!(task.subject.is_none());
    }

    #[test]
    fn toggle_sets_and_clears_completion() {
        let kv = MemoryStore::new();
        let (mut store, clock) = store_at(&kv, noon(2024, 3, 5));
        store.add_task("Read", None, None);

        clock.advance(Duration::minutes(30));
        let task = store.toggle_task("t-1").unwrap();
        assert!(task.done);
        assert_eq!(task.completed_at, Some(clock.now().with_timezone(&Utc)));

        let task = store.toggle_task("t-1").unwrap();
        assert!(!task.done);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let kv = MemoryStore::new();
        let (mut store, _) = store_at(&kv, noon(2024, 3, 5));
        store.add_task("Read", None, None);
        assert!(store.toggle_task("nope").is_none());
        assert!(store.remove_task("nope").is_none());
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn remove_deletes_and_persists() {
        let kv = MemoryStore::new();
        let (mut store, _) = store_at(&kv, noon(2024, 3, 5));
        store.add_task("a", None, None);
        store.add_task("b", None, None);
        let removed = store.remove_task("t-1").unwrap();
        assert_eq!(removed.title, "a");

        let (reloaded, _) = store_at(&kv, noon(2024, 3, 5));
        assert_eq!(reloaded.tasks().len(), 1);
        assert_eq!(reloaded.tasks()[0].title, "b");
    }

    #[test]
    fn filters() {
        let kv = MemoryStore::new();
        let today = noon(2024, 3, 5);
        let (mut store, _) = store_at(&kv, today);
        store.add_task("due today", None, Some(today.date_naive()));
        store.add_task("due tomorrow", None, NaiveDate::from_ymd_opt(2024, 3, 6));
        store.add_task("no due", None, None);
        store.toggle_task("t-2");

        let titles = |f| {
            store
                .filter(f)
                .into_iter()
                .map(|t| t.title.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(titles(TaskFilter::All), ["no due", "due tomorrow", "due today"]);
        assert_eq!(titles(TaskFilter::Active), ["no due", "due today"]);
        assert_eq!(titles(TaskFilter::Done), ["due tomorrow"]);
        assert_eq!(titles(TaskFilter::DueToday), ["due today"]);
    }

    #[test]
    fn filter_parsing() {
        assert_eq!("today".parse::<TaskFilter>().unwrap(), TaskFilter::DueToday);
        assert_eq!("Active".parse::<TaskFilter>().unwrap(), TaskFilter::Active);
        assert!("soon".parse::<TaskFilter>().is_err());
        assert_eq!(TaskFilter::DueToday.to_string(), "today");
    }

    #[test]
    fn streak_needs_completion_today() {
        let kv = MemoryStore::new();
        let (mut store, clock) = store_at(&kv, noon(2024, 3, 3));
        store.add_task("a", None, None);
        store.add_task("b", None, None);
        store.toggle_task("t-1");
        clock.set(noon(2024, 3, 4));
        store.toggle_task("t-2");
        assert_eq!(store.streak(), 2);

        clock.set(noon(2024, 3, 5));
        assert_eq!(store.streak(), 0);
    }

    #[test]
    fn streak_counts_days_not_completions() {
        let kv = MemoryStore::new();
        let (mut store, clock) = store_at(&kv, noon(2024, 3, 4));
        for i in 0..10 {
            store.add_task(&format!("task {i}"), None, None);
        }
        store.toggle_task("t-1");
        clock.set(noon(2024, 3, 5));
        store.toggle_task("t-2");
        assert_eq!(store.streak(), 2);

        clock.set(noon(2024, 3, 4));
        for id in ["t-3", "t-4", "t-5", "t-6"] {
            store.toggle_task(id);
        }
        clock.set(noon(2024, 3, 5));
        for id in ["t-7", "t-8", "t-9", "t-10"] {
            store.toggle_task(id);
        }
        assert_eq!(store.streak(), 2);
    }

    #[test]
    fn uncompleting_only_task_of_today_breaks_streak() {
        let kv = MemoryStore::new();
        let (mut store, clock) = store_at(&kv, noon(2024, 3, 4));
        store.add_task("a", None, None);
        store.add_task("b", None, None);
        store.toggle_task("t-1");
        clock.set(noon(2024, 3, 5));
        store.toggle_task("t-2");
        assert_eq!(store.streak(), 2);
        store.toggle_task("t-2");
        assert_eq!(store.streak(), 0);
    }

    #[test]
    fn summary_counts() {
        let kv = MemoryStore::new();
        let (mut store, _) = store_at(&kv, noon(2024, 3, 5));
        store.add_task("a", None, None);
        store.add_task("b", None, None);
        store.add_task("c", None, None);
        store.toggle_task("t-3");
        assert_eq!(
            store.summary(),
            TaskSummary {
                total: 3,
                active: 2,
                done: 1,
                streak: 1,
            }
        );
    }

    #[test]
    fn loaded_records_are_repaired() {
        let kv = MemoryStore::new();
        let created = noon(2024, 3, 5).with_timezone(&Utc).to_rfc3339();
        let raw = serde_json::json!([
            {"id": "a", "title": "done, no stamp", "done": true, "createdAt": created, "completedAt": null},
            {"id": "b", "title": "open, stamped", "done": false, "createdAt": created, "completedAt": created},
        ]);
        kv.set(TASKS_KEY, &raw.to_string()).unwrap();

        let (store, _) = store_at(&kv, noon(2024, 3, 5));
        let a = store.get("a").unwrap();
        assert_eq!(a.completed_at, Some(a.created_at));
        assert_eq!(store.get("b").unwrap().completed_at, None);
        assert_eq!(store.streak(), 1);
    }

    #[test]
    fn serialized_field_names() {
        let kv = MemoryStore::new();
        let (mut store, _) = store_at(&kv, noon(2024, 3, 5));
        store.add_task("a", None, NaiveDate::from_ymd_opt(2024, 3, 9));
        let raw: serde_json::Value = serde_json::from_str(&kv.raw(TASKS_KEY).unwrap()).unwrap();
        let task = &raw[0];
        for key in ["id", "title", "subject", "due", "done", "createdAt", "completedAt"] {
            assert!(task.get(key).is_some(), "missing {key}");
        }
        assert_eq!(task["due"], "2024-03-09");
    }
}
