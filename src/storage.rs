//! Persistence of tasks, theme and preferences on top of a key-value store.
//!
//! Every slot has a fallible `try_*` form and a forgiving form. The forgiving
//! forms never fail: writes log and report whether they happened, reads log
//! and fall back to a default, so a broken store never takes the session down.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::KeyValueStore;
use crate::error::PersistenceError;
use crate::fields::{Priority, Theme};
use crate::task::Task;
use crate::validate::{validate_category, validate_description, validate_title};

pub const TASKS_KEY: &str = "taskflow-tasks";
pub const THEME_KEY: &str = "taskflow-theme";
pub const PREFERENCES_KEY: &str = "taskflow-preferences";

/// Defaults used to pre-fill new tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub default_category: String,
    pub default_priority: Priority,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_category: "Work".to_string(),
            default_priority: Priority::Medium,
        }
    }
}

/// Encode the collection as the JSON array stored in the task slot.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, PersistenceError> {
    serde_json::to_string(tasks).map_err(|source| PersistenceError::Serialize {
        key: TASKS_KEY,
        source,
    })
}

/// Decode the task slot, checking shape before anything reaches the session.
///
/// Timestamps are parsed back from their text form; ids must be unique and
/// every task must satisfy the same rules a newly created one does.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, PersistenceError> {
    let tasks: Vec<Task> = serde_json::from_str(raw).map_err(|source| PersistenceError::Corrupt {
        key: TASKS_KEY,
        source,
    })?;
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id.as_str()) {
            return Err(PersistenceError::DuplicateId {
                key: TASKS_KEY,
                id: task.id.clone(),
            });
        }
        check_stored_task(task).map_err(|reason| PersistenceError::InvalidTask {
            key: TASKS_KEY,
            id: task.id.clone(),
            reason,
        })?;
    }
    Ok(tasks)
}

fn check_stored_task(task: &Task) -> Result<(), String> {
    validate_title(&task.title).map_err(|e| e.to_string())?;
    validate_description(task.description.as_deref()).map_err(|e| e.to_string())?;
    validate_category(&task.category).map_err(|e| e.to_string())?;
    if task.updated_at < task.created_at {
        return Err("updatedAt is earlier than createdAt".to_string());
    }
    Ok(())
}

/// Persistence adapter over a key-value store.
#[derive(Debug)]
pub struct Storage<S> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn read(&self, key: &'static str) -> Result<Option<String>, PersistenceError> {
        self.store
            .get(key)
            .map_err(|source| PersistenceError::Io { key, source })
    }

    fn write(&mut self, key: &'static str, value: &str) -> Result<(), PersistenceError> {
        self.store
            .set(key, value)
            .map_err(|source| PersistenceError::Io { key, source })
    }

    pub fn try_save_tasks(&mut self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let encoded = encode_tasks(tasks)?;
        self.write(TASKS_KEY, &encoded)?;
        debug!(count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Save the collection. Returns `false` (after logging) if it could not
    /// be written; the in-memory state is unaffected either way.
    pub fn save_tasks(&mut self, tasks: &[Task]) -> bool {
        match self.try_save_tasks(tasks) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save tasks");
                false
            }
        }
    }

    pub fn try_load_tasks(&self) -> Result<Vec<Task>, PersistenceError> {
        match self.read(TASKS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => decode_tasks(&raw),
        }
    }

    /// Load the collection; absent or corrupt data yields an empty list.
    pub fn load_tasks(&self) -> Vec<Task> {
        match self.try_load_tasks() {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(e) => {
                warn!(error = %e, "discarding unreadable task data");
                Vec::new()
            }
        }
    }

    pub fn try_save_theme(&mut self, theme: Theme) -> Result<(), PersistenceError> {
        self.write(THEME_KEY, theme.as_str())
    }

    pub fn save_theme(&mut self, theme: Theme) -> bool {
        match self.try_save_theme(theme) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save theme");
                false
            }
        }
    }

    /// The stored theme, `None` if absent or unrecognised.
    pub fn try_load_theme(&self) -> Result<Option<Theme>, PersistenceError> {
        Ok(self.read(THEME_KEY)?.as_deref().and_then(Theme::from_stored))
    }

    /// Load the theme, defaulting to light.
    pub fn load_theme(&self) -> Theme {
        match self.try_load_theme() {
            Ok(theme) => theme.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "failed to load theme");
                Theme::default()
            }
        }
    }

    pub fn try_save_preferences(&mut self, prefs: &Preferences) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(prefs).map_err(|source| PersistenceError::Serialize {
            key: PREFERENCES_KEY,
            source,
        })?;
        self.write(PREFERENCES_KEY, &encoded)
    }

    pub fn save_preferences(&mut self, prefs: &Preferences) -> bool {
        match self.try_save_preferences(prefs) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save preferences");
                false
            }
        }
    }

    pub fn try_load_preferences(&self) -> Result<Preferences, PersistenceError> {
        match self.read(PREFERENCES_KEY)? {
            None => Ok(Preferences::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| PersistenceError::Corrupt {
                key: PREFERENCES_KEY,
                source,
            }),
        }
    }

    pub fn load_preferences(&self) -> Preferences {
        self.try_load_preferences().unwrap_or_else(|e| {
            warn!(error = %e, "discarding unreadable preferences");
            Preferences::default()
        })
    }
}
