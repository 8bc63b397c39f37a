mod commands;
mod logging;

use clap::{Parser, Subcommand};
use commands::*;
use mine_core::{Application, CoreError};
use std::path::PathBuf;

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Logging initialization failed: {0}")]
    Logging(String),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "mine")]
#[command(about = "Inspect a mine application container", version)]
struct Cli {
    /// Application base path (defaults to the current directory)
    #[arg(long, global = true)]
    base_path: Option<PathBuf>,

    /// Directory holding packaged configuration defaults
    #[arg(long, global = true)]
    package_path: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the application's well-known paths
    Paths,

    /// Load a configuration unit and print it, or every unit in the configuration directory
    Config {
        /// Configuration unit name
        unit: Option<String>,

        /// Dotted key inside the unit
        key: Option<String>,
    },

    /// Resolve services, then report what was loaded along the way
    Resolve {
        /// Binding keys or aliases
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Print the alias and deferred binding tables
    Bindings,
}

impl Cli {
    fn application(&self) -> Result<Application, CoreError> {
        let app = match &self.base_path {
            Some(base) => Application::new(base),
            None => Application::from_current_dir()?,
        };

        Ok(match &self.package_path {
            Some(package) => app.with_package_path(package),
            None => app,
        })
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.json_logs)?;

    let mut app = cli.application()?;
    tracing::debug!(base = %app.paths().base().display(), "Application ready");

    match cli.command {
        Commands::Paths => {
            paths::run(&app);
        }
        Commands::Config { unit, key } => {
            config::run(&mut app, unit.as_deref(), key.as_deref())?;
        }
        Commands::Resolve { keys } => {
            resolve::run(&mut app, &keys)?;
        }
        Commands::Bindings => {
            bindings::run(&app);
        }
    }

    Ok(())
}
