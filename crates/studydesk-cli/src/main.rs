use clap::{Parser, Subcommand};

mod chime;
mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "studydesk", version, about = "Studydesk CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task list and streak
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Study session planner
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Focus timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
