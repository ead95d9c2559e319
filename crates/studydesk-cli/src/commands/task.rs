//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use studydesk_core::task::streak_label;
use studydesk_core::{SqliteStore, TaskFilter, TaskStore};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the top of the list
    Add {
        /// Task title
        title: String,
        /// Subject or course
        #[arg(long)]
        subject: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// List tasks, newest first
    List {
        /// all, active, done or today
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
    },
    /// Mark a task done, or not done again
    Toggle {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Remove {
        /// Task ID
        id: String,
    },
    /// Show the completion streak and task counts
    Streak,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = SqliteStore::open()?;
    let mut store = TaskStore::open(&db);

    match action {
        TaskAction::Add {
            title,
            subject,
            due,
        } => match store.add_task(&title, subject.as_deref(), due) {
            Some(task) => {
                println!("Task created: {}", task.id);
                println!("{}", serde_json::to_string_pretty(task)?);
            }
            None => eprintln!("Nothing added: title is empty"),
        },
        TaskAction::List { filter } => {
            let tasks = store.filter(filter);
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Toggle { id } => match store.toggle_task(&id) {
            Some(task) => println!("{}", serde_json::to_string_pretty(task)?),
            None => println!("Task not found: {id}"),
        },
        TaskAction::Remove { id } => match store.remove_task(&id) {
            Some(_) => println!("Task deleted: {id}"),
            None => println!("Task not found: {id}"),
        },
        TaskAction::Streak => {
            let summary = store.summary();
            println!("{}", streak_label(summary.streak));
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
