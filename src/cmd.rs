//! Command implementations for the CLI interface.
//!
//! Each handler drives the session controller and prints the result. Errors
//! are returned to `main`, which reports them and sets the exit status.

use std::collections::BTreeMap;

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::db::KeyValueStore;
use crate::display::*;
use crate::error::{CliError, TaskError};
use crate::fields::{Priority, TaskFilter, Theme};
use crate::state::TaskFlow;
use crate::storage::Preferences;
use crate::task::{CreateTaskInput, UpdateTaskInput};
use crate::validate::{validate_category, ValidationErrors};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority level; defaults to the saved preference.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Category; defaults to the saved preference.
        #[arg(long)]
        category: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd", "friday", ...
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks, highest priority first.
    List {
        /// Completion status to show.
        #[arg(long, value_enum, default_value_t = TaskFilter::All)]
        filter: TaskFilter,
        /// Case-insensitive text matched against title, description and category.
        #[arg(long)]
        search: Option<String>,
        /// Only tasks in this category.
        #[arg(long)]
        category: Option<String>,
        /// Show at most this many rows.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show every field of one task.
    View {
        /// Task id, unique id prefix, or exact title.
        id: String,
    },

    /// Mark a task complete, or active again.
    Toggle {
        /// Task id, unique id prefix, or exact title.
        id: String,
    },

    /// Change fields of an existing task.
    Edit {
        /// Task id, unique id prefix, or exact title.
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// New description; an empty string clears it.
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        completed: Option<bool>,
    },

    /// Delete a task.
    Delete {
        /// Task id, unique id prefix, or exact title.
        id: String,
    },

    /// Delete every completed task.
    ClearCompleted,

    /// List categories in use with their task counts.
    Categories,

    /// Show totals, overdue count and completion rate.
    Stats,

    /// Show or change the colour theme.
    Theme {
        #[arg(value_enum)]
        theme: Option<Theme>,
        /// Switch to the other theme.
        #[arg(long, conflicts_with = "theme")]
        toggle: bool,
    },

    /// Show or change the defaults used by `add`.
    Prefs {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_due(due: &str) -> Result<chrono::DateTime<chrono::Utc>, CliError> {
    parse_due_input(due).ok_or_else(|| CliError::InvalidDue(due.to_string()))
}

fn warn_if_unsaved<S: KeyValueStore>(flow: &TaskFlow<S>) {
    if flow.has_unsaved_changes() {
        eprintln!("warning: change applied but could not be saved; it will be lost on exit");
    }
}

/// Create a task, filling priority and category from preferences.
pub fn cmd_add<S: KeyValueStore>(
    flow: &mut TaskFlow<S>,
    title: String,
    desc: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
    due: Option<String>,
) -> Result<(), CliError> {
    let prefs = flow.preferences();
    let priority = priority.unwrap_or(prefs.default_priority);
    let category = category.unwrap_or_else(|| prefs.default_category.clone());

    let mut input = CreateTaskInput::new(title, priority, category);
    if let Some(desc) = desc {
        input = input.with_description(desc);
    }
    if let Some(due) = due.as_deref() {
        input = input.with_due_date(parse_due(due)?);
    }

    let task = flow.create(input)?;
    println!("Added task {} ({})", short_id(&task.id), task.title);
    warn_if_unsaved(flow);
    Ok(())
}

/// Print the derived view and a stats line.
pub fn cmd_list<S: KeyValueStore>(
    flow: &mut TaskFlow<S>,
    filter: TaskFilter,
    search: Option<String>,
    category: Option<String>,
    limit: Option<usize>,
) {
    flow.set_filter(filter);
    flow.set_search_term(search.unwrap_or_default());
    flow.set_selected_category(category);

    let now = flow.now();
    let mut view = flow.view();
    if view.is_empty() {
        println!("{}", empty_message(flow.tasks().len(), filter));
    } else {
        if let Some(n) = limit {
            view.truncate(n);
        }
        print_table(&view, now);
    }
    if !flow.tasks().is_empty() {
        println!();
        println!("{}", format_stats(&flow.stats()));
    }
}

pub fn cmd_view<S: KeyValueStore>(flow: &TaskFlow<S>, id: &str) -> Result<(), CliError> {
    let task = flow.resolve(id)?;
    print_task(task, flow.now());
    Ok(())
}

pub fn cmd_toggle<S: KeyValueStore>(flow: &mut TaskFlow<S>, id: &str) -> Result<(), CliError> {
    let id = flow.resolve(id)?.id.clone();
    let task = flow.toggle_complete(&id)?;
    let state = if task.completed { "completed" } else { "active" };
    println!("Task {} is now {state}", short_id(&task.id));
    warn_if_unsaved(flow);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_edit<S: KeyValueStore>(
    flow: &mut TaskFlow<S>,
    id: &str,
    title: Option<String>,
    desc: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
    due: Option<String>,
    clear_due: bool,
    completed: Option<bool>,
) -> Result<(), CliError> {
    let due_date = match due.as_deref() {
        Some(d) => Some(Some(parse_due(d)?)),
        None if clear_due => Some(None),
        None => None,
    };
    let updates = UpdateTaskInput {
        title,
        description: desc,
        priority,
        category,
        due_date,
        completed,
    };
    if updates.is_empty() {
        return Err(CliError::NothingToUpdate);
    }

    let id = flow.resolve(id)?.id.clone();
    let task = flow.edit(&id, updates)?;
    println!("Updated task {}", short_id(&task.id));
    warn_if_unsaved(flow);
    Ok(())
}

pub fn cmd_delete<S: KeyValueStore>(flow: &mut TaskFlow<S>, id: &str) -> Result<(), CliError> {
    let id = flow.resolve(id)?.id.clone();
    let removed = flow.delete(&id)?;
    println!("Deleted task {} ({})", short_id(&removed.id), removed.title);
    warn_if_unsaved(flow);
    Ok(())
}

pub fn cmd_clear_completed<S: KeyValueStore>(flow: &mut TaskFlow<S>) {
    let removed = flow.clear_completed();
    println!("Cleared {removed} completed task{}", if removed == 1 { "" } else { "s" });
    warn_if_unsaved(flow);
}

/// List all distinct categories with their usage counts.
pub fn cmd_categories<S: KeyValueStore>(flow: &TaskFlow<S>) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for t in flow.tasks() {
        *counts.entry(t.category.as_str()).or_default() += 1;
    }
    println!("{:<16} {}", "Category", "Count");
    for (c, n) in counts {
        println!("{:<16} {}", truncate(c, 16), n);
    }
}

pub fn cmd_stats<S: KeyValueStore>(flow: &TaskFlow<S>) {
    println!("{}", format_stats(&flow.stats()));
}

pub fn cmd_theme<S: KeyValueStore>(flow: &mut TaskFlow<S>, theme: Option<Theme>, toggle: bool) {
    if toggle {
        flow.toggle_theme();
    } else if let Some(theme) = theme {
        flow.set_theme(theme);
    }
    println!("Theme: {}", flow.theme());
}

pub fn cmd_prefs<S: KeyValueStore>(
    flow: &mut TaskFlow<S>,
    category: Option<String>,
    priority: Option<Priority>,
) -> Result<(), CliError> {
    if category.is_some() || priority.is_some() {
        let mut prefs: Preferences = flow.preferences().clone();
        if let Some(category) = category {
            validate_category(&category)
                .map_err(|e| TaskError::Invalid(ValidationErrors(vec![e])))?;
            prefs.default_category = category.trim().to_string();
        }
        if let Some(priority) = priority {
            prefs.default_priority = priority;
        }
        flow.set_preferences(prefs);
    }
    let prefs = flow.preferences();
    println!("Default category: {}", prefs.default_category);
    println!("Default priority: {}", prefs.default_priority);
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
