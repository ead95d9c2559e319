//! Study session planner commands for CLI.

use clap::Subcommand;
use serde_json::json;
use studydesk_core::{parse_minutes, Config, PlannerStore, SqliteStore};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Plan a study session
    Add {
        /// Session title
        title: String,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Start time (HH:MM)
        #[arg(long)]
        time: String,
        /// Length in minutes, 15 to 300 (default: planner.default_duration)
        #[arg(long)]
        duration: Option<String>,
    },
    /// List all sessions by start time
    List,
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = SqliteStore::open()?;
    let mut planner = PlannerStore::open(&db);

    match action {
        PlanAction::Add {
            title,
            date,
            time,
            duration,
        } => {
            let minutes = match duration {
                Some(raw) => parse_minutes(&raw),
                None => i64::from(Config::load_or_default().planner.default_duration),
            };
            match planner.add_session(&title, &date, &time, minutes) {
                Some(session) => {
                    println!("Session planned: {}", session.id);
                    println!("{}", serde_json::to_string_pretty(session)?);
                }
                None => eprintln!("Nothing planned: title, date and time are required"),
            }
        }
        PlanAction::List => {
            let sessions: Vec<_> = planner
                .list_upcoming()
                .into_iter()
                .map(|s| {
                    json!({
                        "id": s.id,
                        "title": s.title,
                        "start": s.start,
                        "end": s.end,
                        "duration": s.duration,
                        "today": planner.is_today(&s.start),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }
    Ok(())
}
