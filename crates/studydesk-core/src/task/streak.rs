//! Completion streaks.
//!
//! A streak is the number of consecutive calendar days, ending today, on
//! which at least one task was completed. A run that ended yesterday counts
//! as zero.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::Task;
use crate::clock::date_key;

/// Distinct local dates on which some task was completed.
pub fn completion_days<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> BTreeSet<NaiveDate> {
    tasks
        .into_iter()
        .filter_map(|t| t.completed_at.as_ref())
        .map(date_key)
        .collect()
}

/// Length of the run of completion days ending at `today`.
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if !days.contains(&day) {
            break;
        }
        count += 1;
        cursor = day.pred_opt();
    }
    count
}

/// Header text for a streak, e.g. `"1 day streak"`, `"3 days streak"`.
pub fn streak_label(streak: u32) -> String {
    if streak == 1 {
        "1 day streak".to_string()
    } else {
        format!("{streak} days streak")
    }
}
