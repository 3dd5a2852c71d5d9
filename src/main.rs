//! # taskflow
//!
//! Command-line front end for the TaskFlow task manager.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! taskflow add "Finish report" --priority high --category Work --due friday
//!
//! # List active tasks, highest priority first
//! taskflow list --filter active
//!
//! # Complete it by id prefix or title
//! taskflow toggle "Finish report"
//! ```
//!
//! Data is stored in the platform data directory (for example
//! `~/.local/share/taskflow/`), one file per slot. Override it with
//! `--data-dir` or `TASKFLOW_DATA_DIR`.

use clap::Parser;
use tracing::debug;

use taskflow::cli::{init_tracing, Cli};
use taskflow::cmd::*;
use taskflow::config::Config;
use taskflow::db::FileStore;
use taskflow::error::CliError;
use taskflow::state::TaskFlow;
use taskflow::storage::Storage;

fn run(cli: Cli) -> Result<(), CliError> {
    // Completions never touch the data directory.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let config = Config::resolve(cli.data_dir.as_deref())?;
    debug!(dir = %config.data_dir.display(), "using data directory");
    let store = FileStore::open(&config.data_dir)?;
    let mut flow = TaskFlow::load(Storage::new(store));

    match cli.command {
        Commands::Add { title, desc, priority, category, due } => {
            cmd_add(&mut flow, title, desc, priority, category, due)
        }
        Commands::List { filter, search, category, limit } => {
            cmd_list(&mut flow, filter, search, category, limit);
            Ok(())
        }
        Commands::View { id } => cmd_view(&flow, &id),
        Commands::Toggle { id } => cmd_toggle(&mut flow, &id),
        Commands::Edit { id, title, desc, priority, category, due, clear_due, completed } => {
            cmd_edit(&mut flow, &id, title, desc, priority, category, due, clear_due, completed)
        }
        Commands::Delete { id } => cmd_delete(&mut flow, &id),
        Commands::ClearCompleted => {
            cmd_clear_completed(&mut flow);
            Ok(())
        }
        Commands::Categories => {
            cmd_categories(&flow);
            Ok(())
        }
        Commands::Stats => {
            cmd_stats(&flow);
            Ok(())
        }
        Commands::Theme { theme, toggle } => {
            cmd_theme(&mut flow, theme, toggle);
            Ok(())
        }
        Commands::Prefs { category, priority } => cmd_prefs(&mut flow, category, priority),
        Commands::Completions { .. } => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
