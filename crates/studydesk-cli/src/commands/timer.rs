use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use studydesk_core::storage::TIMER_KEY;
use studydesk_core::{
    parse_minutes, Config, Event, KvStore, RunOutcome, SqliteStore, TimerDriver, TimerEngine,
    TimerMessage,
};

use crate::chime::TerminalChime;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Count down in the foreground; Ctrl-C pauses and saves
    Run {
        /// Set the duration in minutes before starting
        #[arg(long)]
        minutes: Option<String>,
    },
    /// Set the duration in minutes (1 to 180)
    Set {
        minutes: String,
    },
    /// Stop and restore 25:00
    Reset,
    /// Print current timer state as JSON
    Status,
}

fn load_engine(db: &SqliteStore) -> TimerEngine {
    if let Ok(Some(json)) = db.get(TIMER_KEY) {
        if let Ok(engine) = serde_json::from_str::<TimerEngine>(&json) {
            return engine;
        }
        tracing::warn!("discarding malformed timer state");
    }
    TimerEngine::new()
}

fn save_engine(db: &SqliteStore, engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.set(TIMER_KEY, &json)?;
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

fn run_foreground(db: &SqliteStore, mut engine: TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let period = Duration::from_millis(config.timer.tick_ms.max(1));
    let chime = TerminalChime::new(config.notifications.tone_enabled);

    // A saved engine is always stopped; make sure it is before driving it.
    engine.pause();
    let mut driver =
        TimerDriver::new(engine, period, chime).with_alert_message(config.notifications.alert_message);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(async {
        let Some(started) = driver.handle(TimerMessage::Start) else {
            return None;
        };
        eprintln!("{}  (Ctrl-C to pause)", driver.engine().display());
        tracing::debug!(?started, "timer started");

        let tx = driver.sender();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(TimerMessage::Pause);
                let _ = tx.send(TimerMessage::Shutdown);
            }
        });

        let mut completed = None;
        let outcome = driver
            .run(|engine, event| {
                eprint!("\r{}", engine.display());
                let _ = std::io::stderr().flush();
                if let Some(event) = event.filter(|e| e.is_completion()) {
                    completed = Some(event.clone());
                }
            })
            .await;
        eprintln!();
        Some((outcome, completed))
    });

    match outcome {
        None => println!(
            "Timer is at 00:00; use `timer set` or `timer reset` first"
        ),
        Some((RunOutcome::Completed, Some(event))) => print_event(&event)?,
        Some(_) => print_event(&driver.engine().snapshot())?,
    }

    save_engine(db, driver.engine())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = SqliteStore::open()?;
    let mut engine = load_engine(&db);

    match action {
        TimerAction::Run { minutes } => {
            if let Some(raw) = minutes {
                engine.pause();
                engine.set_duration(parse_minutes(&raw));
            }
            return run_foreground(&db, engine);
        }
        TimerAction::Set { minutes } => {
            engine.pause();
            if let Some(event) = engine.set_duration(parse_minutes(&minutes)) {
                print_event(&event)?;
            }
        }
        TimerAction::Reset => {
            print_event(&engine.reset())?;
        }
        TimerAction::Status => {
            print_event(&engine.snapshot())?;
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}
