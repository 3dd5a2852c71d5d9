use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cmd::Commands;

/// Personal task manager.
/// Data lives in the platform data directory unless --data-dir or
/// TASKFLOW_DATA_DIR points elsewhere.
#[derive(Parser)]
#[command(name = "taskflow", version, about = "Personal task management CLI")]
pub struct Cli {
    /// Directory holding the task, theme and preference files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output.
    #[arg(short, long, action = ArgAction::Count, global = true, conflicts_with = "verbose")]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log level picked from the -v/-q counts.
pub fn default_level(verbose: u8, quiet: u8) -> &'static str {
    if quiet >= 1 {
        "error"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the flags.
pub fn init_tracing(verbose: u8, quiet: u8) {
    let level = default_level(verbose, quiet);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
}
