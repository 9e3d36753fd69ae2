//! jobwatch CLI
//!
//! One-shot entry point meant for cron or a CI schedule: every invocation
//! checks both boards once and exits.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jobwatch::{
    error::Result,
    models::{Board, Config, Secrets, Settings},
    pipeline,
    storage::{LocalSnapshotStore, SnapshotStore},
};

/// jobwatch - Getro job board change notifier
#[derive(Parser, Debug)]
#[command(
    name = "jobwatch",
    version,
    about = "Posts added and removed Getro jobs to Slack"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "jobwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check both boards and notify changes (default)
    Run,

    /// Validate configuration and environment without network access
    Validate,

    /// Show the stored snapshot of a board
    Show {
        /// Board name: farming or hunting
        board: Board,
    },
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
///
/// Configuration errors exit with status 2, any other error with 1.
/// A degraded run still exits 0.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_fatal() => {
            eprintln!("Configuration error: {e}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = Config::load_or_default(&cli.config)?;
    init_logging(cli.verbose, &config.logging.level);

    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!(".env not loaded: {e}"),
    }

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let settings = Settings::new(config, Secrets::from_env()?)?;
            let report = pipeline::run_watch(&settings).await?;
            if report.is_degraded() {
                log::warn!("Run finished with problems, see log above");
            } else {
                log::info!("Run complete!");
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            let settings = Settings::new(config, Secrets::from_env()?)?;
            for board in Board::ALL {
                log::info!(
                    "✓ {} board: network {}, snapshot {}",
                    board,
                    settings.secrets.network_id(board),
                    settings.config.snapshot_path(board).display()
                );
            }
            log::info!("All validations passed!");
        }

        Command::Show { board } => {
            let store = LocalSnapshotStore::from_config(&config);
            match store.read(board).await? {
                None => log::info!("No snapshot at {}", store.path(board).display()),
                Some(jobs) => {
                    log::info!(
                        "{} jobs stored for {} board in {}",
                        jobs.len(),
                        board,
                        store.path(board).display()
                    );
                    for job in &jobs {
                        println!("{}\t{}\t{}\t{}", job.id, job.company, job.title, job.url);
                    }
                }
            }
        }
    }

    Ok(())
}
