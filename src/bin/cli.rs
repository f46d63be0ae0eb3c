//! steam-ingest CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use steam_ingest::{
    config,
    error::Result,
    input, pipeline,
    storage::{export_csv, PackageStore},
};

/// steam-ingest - Steam package details loader
#[derive(Parser, Debug)]
#[command(
    name = "steam-ingest",
    version,
    about = "Fetches Steam package details and loads them into SQLite"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch package data for every identifier in a CSV file
    Ingest {
        /// CSV file with a PACKAGEID column
        csv: PathBuf,

        /// Delete any existing database before the run
        #[arg(long)]
        fresh: bool,
    },

    /// Mirror the packages and apps relations to CSV files
    Export {
        /// Output directory (default: storage.export_dir or data/export)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration and print the effective values
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = config::load(&cli.config)?;

    match cli.command {
        Command::Ingest { csv, fresh } => {
            if fresh {
                config.storage.reset_on_start = true;
            }
            let ids = input::read_package_ids(&csv)?;
            pipeline::run_ingest(&config, ids).await?;
        }

        Command::Export { output } => {
            let dir = output
                .or_else(|| config.storage.export_dir.clone())
                .unwrap_or_else(|| PathBuf::from("data/export"));
            let store = PackageStore::open(&config.storage.db_path)?;
            store.ensure_schema()?;
            let summary = export_csv(&store, &dir)?;
            log::info!(
                "wrote {} package rows to {} and {} app rows to {}",
                summary.package_rows,
                summary.packages_path.display(),
                summary.app_rows,
                summary.apps_path.display()
            );
        }

        Command::Validate => {
            println!("configuration OK");
            println!("  endpoint:        {}", config.provider.endpoint);
            println!(
                "  api_key:         set ({} chars)",
                config.provider.api_key.len()
            );
            println!("  timeout:         {}s", config.provider.timeout_secs);
            println!("  requests_limit:  {}", config.scheduler.requests_limit);
            println!("  max_concurrent:  {}", config.scheduler.max_concurrent);
            println!("  cooldown:        {}s", config.scheduler.cooldown_secs);
            println!("  environment:     {:?}", config.scheduler.environment);
            println!("  database:        {}", config.storage.db_path.display());
        }
    }

    Ok(())
}
