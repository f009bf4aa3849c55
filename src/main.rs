mod config;
mod parser;
mod report;
mod tracker;

use anyhow::Result;
use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::tracker::SessionTracker;

#[derive(Parser)]
#[command(name = "claude-sessions")]
#[command(about = "Track Claude Code session usage against the monthly quota")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current month usage and the active session
    Status,
    /// Show session history for the last N days
    History {
        /// Days to look back; non-numeric input falls back to the default
        #[arg(default_value = "7", value_parser = parse_days)]
        days: i64,
    },
    /// Project end-of-month usage and a recommended pace
    Predict,
    // Anything else prints usage help
    #[command(external_subcommand)]
    Other(Vec<String>),
}

fn parse_days(s: &str) -> Result<i64, std::convert::Infallible> {
    Ok(s.parse().ok().filter(|d| *d >= 0).unwrap_or(7))
}

fn main() {
    let cli = Cli::parse();

    // Reports go to stdout; diagnostics stay on stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "claude_sessions=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Other(_)) => {
            // Unknown commands show usage and exit cleanly
            Cli::command().print_help()?;
            Ok(())
        }
        command => {
            let mut tracker = SessionTracker::new(&Config::default());
            tracker.load_all()?;

            let now = Local::now();
            match command {
                Some(Commands::History { days }) => report::show_history(&tracker, now, days),
                Some(Commands::Predict) => report::show_prediction(&tracker, now),
                _ => report::show_status(&tracker, now),
            }
            Ok(())
        }
    }
}
