//! The application state controller.
//!
//! `TaskFlow` owns the authoritative task collection for a session together
//! with the view criteria and theme. All changes go through its methods; each
//! successful mutation ends by writing the collection back to storage. Front
//! ends only ever get shared borrows of the tasks.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::db::KeyValueStore;
use crate::error::TaskError;
use crate::fields::{TaskFilter, Theme};
use crate::storage::{Preferences, Storage};
use crate::task::{generate_id, CreateTaskInput, Task, UpdateTaskInput};
use crate::validate::validate_update_input;
use crate::view::{compute_stats, derive_view, unique_categories, TaskStats, ViewCriteria};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F: Fn() -> DateTime<Utc>> Clock for F {
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

pub struct TaskFlow<S: KeyValueStore> {
    tasks: Vec<Task>,
    criteria: ViewCriteria,
    theme: Theme,
    preferences: Preferences,
    storage: Storage<S>,
    clock: Box<dyn Clock>,
    unsaved: bool,
}

impl<S: KeyValueStore> TaskFlow<S> {
    /// Hydrate a session from storage using the system clock.
    pub fn load(storage: Storage<S>) -> Self {
        Self::with_clock(storage, Box::new(SystemClock))
    }

    pub fn with_clock(storage: Storage<S>, clock: Box<dyn Clock>) -> Self {
        let tasks = storage.load_tasks();
        let theme = storage.load_theme();
        let preferences = storage.load_preferences();
        info!(tasks = tasks.len(), theme = %theme, "session loaded");
        Self {
            tasks,
            criteria: ViewCriteria::default(),
            theme,
            preferences,
            storage,
            clock,
            unsaved: false,
        }
    }

    // --- read-only projection ---

    /// The full collection in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn filter(&self) -> TaskFilter {
        self.criteria.filter
    }

    pub fn search_term(&self) -> &str {
        &self.criteria.search_term
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.criteria.selected_category.as_deref()
    }

    pub fn criteria(&self) -> &ViewCriteria {
        &self.criteria
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The filtered, priority-sorted tasks for the current criteria.
    /// Recomputed on every call.
    pub fn view(&self) -> Vec<&Task> {
        let view = derive_view(&self.tasks, &self.criteria);
        debug!(shown = view.len(), total = self.tasks.len(), "derived view");
        view
    }

    pub fn categories(&self) -> Vec<String> {
        unique_categories(&self.tasks)
    }

    /// Statistics over the whole collection, not just the view.
    pub fn stats(&self) -> TaskStats {
        compute_stats(&self.tasks, self.now())
    }

    /// True when the most recent task write failed.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Find a task by full id, unique id prefix, or exact title (ignoring
    /// case), in that order.
    pub fn resolve(&self, identifier: &str) -> Result<&Task, TaskError> {
        let identifier = identifier.trim();
        if let Some(task) = self.get(identifier) {
            return Ok(task);
        }
        if identifier.is_empty() {
            return Err(TaskError::NotFound(identifier.to_string()));
        }

        let by_prefix: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.id.starts_with(identifier))
            .collect();
        match by_prefix.len() {
            1 => return Ok(by_prefix[0]),
            0 => {}
            n => return Err(TaskError::Ambiguous(identifier.to_string(), n)),
        }

        let wanted = identifier.to_lowercase();
        let by_title: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.title.to_lowercase() == wanted)
            .collect();
        match by_title.len() {
            0 => Err(TaskError::NotFound(identifier.to_string())),
            1 => Ok(by_title[0]),
            n => Err(TaskError::Ambiguous(identifier.to_string(), n)),
        }
    }

    // --- mutations ---

    fn index_of(&self, id: &str) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    /// Final step of every successful mutation.
    fn persist(&mut self) {
        self.unsaved = !self.storage.save_tasks(&self.tasks);
        if self.unsaved {
            warn!("changes kept in memory but not saved");
        }
    }

    /// Validate and append a new task.
    pub fn create(&mut self, input: CreateTaskInput) -> Result<&Task, TaskError> {
        let mut task = Task::create(input, self.now())?;
        while self.get(&task.id).is_some() {
            task.id = generate_id();
        }
        info!(id = %task.id, priority = %task.priority, category = %task.category, "created task");
        self.tasks.push(task);
        self.persist();
        let idx = self.tasks.len() - 1;
        Ok(&self.tasks[idx])
    }

    /// Flip completion on a task.
    pub fn toggle_complete(&mut self, id: &str) -> Result<&Task, TaskError> {
        let idx = self.index_of(id)?;
        let now = self.now();
        let task = &mut self.tasks[idx];
        task.completed = !task.completed;
        task.touch(now);
        info!(id, completed = task.completed, "toggled task");
        self.persist();
        Ok(&self.tasks[idx])
    }

    /// Apply a partial update. Invalid fields reject the whole update.
    pub fn edit(&mut self, id: &str, updates: UpdateTaskInput) -> Result<&Task, TaskError> {
        let idx = self.index_of(id)?;
        validate_update_input(&updates)?;
        let now = self.now();
        self.tasks[idx].apply(updates, now);
        info!(id, "edited task");
        self.persist();
        Ok(&self.tasks[idx])
    }

    /// Remove a task and hand it back.
    pub fn delete(&mut self, id: &str) -> Result<Task, TaskError> {
        let idx = self.index_of(id)?;
        let removed = self.tasks.remove(idx);
        info!(id, "deleted task");
        self.persist();
        Ok(removed)
    }

    /// Remove every completed task; returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        info!(removed, "cleared completed tasks");
        self.persist();
        removed
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.criteria.filter = filter;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.criteria.search_term = term.into();
    }

    pub fn set_selected_category(&mut self, category: Option<String>) {
        self.criteria.selected_category = category;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.storage.save_theme(theme);
        debug!(theme = %theme, "theme set");
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.storage.save_preferences(&preferences);
        self.preferences = preferences;
    }

    /// Hand back the storage adapter, ending the session.
    pub fn into_storage(self) -> Storage<S> {
        self.storage
    }
}
