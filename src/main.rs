use std::{fs::File, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod cli;

/// mealbox - Weekly menu scheduling
#[derive(Parser)]
#[command(name = "mealbox")]
#[command(about = "Weekly menu rotation, order deadlines and day grouping", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show rotation slot, order deadline and delivery date of the week containing DATE
    Schedule {
        /// Calendar date, YYYY-MM-DD
        date: String,
    },
    /// List schedules of the upcoming weeks
    Upcoming {
        /// First date to consider (defaults to today, UTC)
        #[arg(long)]
        from: Option<String>,

        /// Number of weeks to list
        #[arg(long, default_value_t = 4)]
        weeks: usize,
    },
    /// Group a JSON array of menu line items by day
    Group {
        /// Week start date, YYYY-MM-DD
        #[arg(long)]
        week_start: String,

        /// JSON file to read (defaults to stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = mealbox::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealbox::observability::init_logging(&config.logging.level, config.logging.format)?;

    let policy = config
        .schedule_policy()
        .map_err(|e| anyhow::anyhow!(e))?;
    let mut stdout = io::stdout().lock();

    let result = match cli.command {
        Commands::Schedule { date } => cli::schedule::schedule(&policy, &date, &mut stdout),
        Commands::Upcoming { from, weeks } => {
            cli::schedule::upcoming(&policy, from.as_deref(), weeks, &mut stdout)
        }
        Commands::Group { week_start, input } => match input {
            Some(path) => File::open(&path)
                .with_context(|| format!("failed to open {}", path.display()))
                .and_then(|file| cli::menu::group(&week_start, file, &mut stdout)),
            None => cli::menu::group(&week_start, io::stdin().lock(), &mut stdout),
        },
    };

    if let Err(err) = &result {
        tracing::error!(err = %err, "Command failed");
    }

    result
}
