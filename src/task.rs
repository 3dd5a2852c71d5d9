//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct together with the input shapes
//! used to create and update it. Construction always validates: a `Task` can
//! only be built from input that passed the rules in [`crate::validate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::Priority;
use crate::validate::{validate_create_input, ValidationErrors};

/// A single todo item.
///
/// Field names are serialized in camelCase so the stored collection keeps
/// the `createdAt` / `updatedAt` / `dueDate` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub priority: Priority,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTaskInput {
    /// Input with only the required fields set.
    pub fn new(title: impl Into<String>, priority: Priority, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority,
            category: category.into(),
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }
}

/// Partial update. `None` leaves a field untouched.
///
/// `description: Some("")` clears the description; `due_date: Some(None)`
/// clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
}

impl UpdateTaskInput {
    pub fn is_empty(&self) -> bool {
        *self == UpdateTaskInput::default()
    }
}

/// Trim a description, mapping blank text to `None`.
fn normalise_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// Generate a fresh opaque task identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

impl Task {
    /// Build a new task from validated input.
    ///
    /// Validation is part of construction: invalid input yields every rule
    /// violation and no task.
    pub fn create(input: CreateTaskInput, now: DateTime<Utc>) -> Result<Task, ValidationErrors> {
        validate_create_input(&input)?;
        Ok(Task {
            id: generate_id(),
            title: input.title.trim().to_string(),
            description: normalise_description(input.description.as_deref()),
            completed: false,
            priority: input.priority,
            category: input.category.trim().to_string(),
            created_at: now,
            updated_at: now,
            due_date: input.due_date,
        })
    }

    /// Refresh `updated_at`, never letting it fall behind `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Apply a partial update. Callers validate `updates` first.
    pub fn apply(&mut self, updates: UpdateTaskInput, now: DateTime<Utc>) {
        if let Some(title) = updates.title {
            self.title = title.trim().to_string();
        }
        if let Some(desc) = updates.description {
            self.description = normalise_description(Some(&desc));
        }
        if let Some(priority) = updates.priority {
            self.priority = priority;
        }
        if let Some(category) = updates.category {
            self.category = category.trim().to_string();
        }
        if let Some(due) = updates.due_date {
            self.due_date = due;
        }
        if let Some(completed) = updates.completed {
            self.completed = completed;
        }
        self.touch(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationError;
    use chrono::{Duration, TimeZone};

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, 0, 0).unwrap()
    }

    #[test]
    fn test_create_trims_and_defaults() {
        let now = at(9);
        let task = Task::create(
            CreateTaskInput::new("  Buy milk ", Priority::Low, " Shopping ").with_description("  2 litres "),
            now,
        )
        .unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.category, "Shopping");
        assert_eq!(task.description.as_deref(), Some("2 litres"));
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(task.created_at, now);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let err = Task::create(CreateTaskInput::new("   ", Priority::High, "Work"), at(9)).unwrap_err();
        assert_eq!(err.0, vec![ValidationError::TitleRequired]);
    }

    #[test]
    fn test_blank_description_becomes_none() {
        let task = Task::create(
            CreateTaskInput::new("Call mum", Priority::Medium, "Personal").with_description("   "),
            at(9),
        )
        .unwrap();
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Task::create(CreateTaskInput::new("a", Priority::Low, "x"), at(1)).unwrap();
        let b = Task::create(CreateTaskInput::new("a", Priority::Low, "x"), at(1)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_apply_changes_only_given_fields() {
        let mut task = Task::create(CreateTaskInput::new("Report", Priority::Low, "Work"), at(9)).unwrap();
        task.apply(
            UpdateTaskInput {
                priority: Some(Priority::Urgent),
                due_date: Some(Some(at(17))),
                ..Default::default()
            },
            at(10),
        );
        assert_eq!(task.title, "Report");
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(task.due_date, Some(at(17)));
        assert_eq!(task.updated_at, at(10));

        task.apply(
            UpdateTaskInput {
                due_date: Some(None),
                description: Some(String::new()),
                ..Default::default()
            },
            at(11),
        );
        assert_eq!(task.due_date, None);
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_touch_never_precedes_creation() {
        let mut task = Task::create(CreateTaskInput::new("Report", Priority::Low, "Work"), at(9)).unwrap();
        task.touch(at(9) - Duration::hours(2));
        assert_eq!(task.updated_at, task.created_at);
    }

    #[test]
    fn test_serialized_layout_uses_camel_case() {
        let task = Task::create(CreateTaskInput::new("Report", Priority::High, "Work"), at(9)).unwrap();
        let json = serde_json::to_value(&task).unwrap();
        let created = json["createdAt"].as_str().unwrap();
        assert_eq!(DateTime::parse_from_rfc3339(created).unwrap(), at(9));
        assert_eq!(json["priority"], "high");
        assert!(json.get("dueDate").is_none());
        assert!(json.get("description").is_none());
    }
}
