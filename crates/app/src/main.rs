use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use quiz_core::model::{SessionMode, TestId};
use services::{AppServices, CatalogService, Clock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod display;
mod input;
mod take;

/// Practice and timed exam sessions over a local question bank.
#[derive(Debug, Parser)]
#[command(name = "quiz", version, about)]
struct Cli {
    /// Question bank produced by `import_bank`.
    #[arg(long, env = "QUIZ_BANK", default_value = "data/questions.json", global = true)]
    bank: PathBuf,

    /// `SQLite` database holding attempt history.
    #[arg(long = "db", env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3", global = true)]
    db_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List available tests.
    Tests {
        /// Case-insensitive filter on the test name.
        #[arg(long)]
        search: Option<String>,
    },
    /// Take a test.
    Take {
        test_id: TestId,
        #[arg(long, default_value = "timed")]
        mode: SessionMode,
    },
    /// Show past results, most recent first.
    History,
    /// Delete all past results.
    ClearHistory {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Creates the database file and its parent directory so the pool can open it.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn Error>> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(format!("invalid --db value: {db_url}").into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    debug!(bank = %cli.bank.display(), db = %db_url, "opening storage");
    let services = AppServices::new_sqlite(&cli.bank, &db_url, Clock::system()).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    match cli.command {
        Command::Tests { search } => {
            let catalog = services.catalog();
            let tests = match search.as_deref() {
                Some(query) => catalog.search(query),
                None => catalog.list(),
            };
            display::print_catalog(&CatalogService::group_by_subject(tests));
        }
        Command::Take { test_id, mode } => {
            take::run(&services.quiz(), &test_id, mode, &mut lines).await?;
        }
        Command::History => {
            display::print_history(&services.history().list().await);
        }
        Command::ClearHistory { yes } => {
            if !yes {
                println!("Are you sure you want to clear all test history? [y/N]");
                let answer = lines.next_line().await?.unwrap_or_default();
                if !input::is_yes(&answer) {
                    println!("Nothing cleared.");
                    return Ok(());
                }
            }
            if services.history().clear().await {
                println!("History cleared.");
            } else {
                return Err("failed to clear history".into());
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
