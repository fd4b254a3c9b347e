//! OpenLineage CLI: emit run events from the shell.
//!
//! Commands:
//! - `emit`     Emit a single event for a new or resumed run
//! - `wrap`     Run a command as a job (START, then COMPLETE or FAIL)
//! - `config`   Show the effective configuration or its path

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use openlineage_core::EventType;
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(
    name = "openlineage",
    about = "Emit OpenLineage run events",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.openlineage/config.toml)
    #[arg(short, long, global = true, env = "OPENLINEAGE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit one event for a run
    Emit {
        /// Job name
        #[arg(short, long)]
        job: String,

        /// Event type: start, running, complete, fail, abort, other
        #[arg(short, long, default_value = "start")]
        event: EventType,

        /// Resume an existing run instead of starting a new one
        #[arg(long)]
        run_id: Option<Uuid>,

        /// Job name of the parent run
        #[arg(long, requires = "parent_run_id")]
        parent_job: Option<String>,

        /// Run id of the parent run
        #[arg(long, requires = "parent_job")]
        parent_run_id: Option<Uuid>,
    },

    /// Run a command as a job
    Wrap {
        /// Job name
        #[arg(short, long)]
        job: String,

        /// Use this run id instead of a fresh one
        #[arg(long)]
        run_id: Option<Uuid>,

        /// The command to run, after `--`
        #[arg(trailing_var_arg = true, required = true, num_args = 1..)]
        command: Vec<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the default config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to the console transport
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Emit {
            job,
            event,
            run_id,
            parent_job,
            parent_run_id,
        } => {
            let parent = parent_job.zip(parent_run_id);
            commands::emit::run(config_path, job, event, run_id, parent).await?
        }
        Commands::Wrap {
            job,
            run_id,
            command,
        } => {
            let code = commands::wrap::run(config_path, job, run_id, command).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config_path).await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(())
}
