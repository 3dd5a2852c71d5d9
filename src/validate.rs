//! Input validation for task fields.
//!
//! Limits are measured in characters after trimming surrounding whitespace.

use crate::task::{CreateTaskInput, UpdateTaskInput};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A single rule violation on task input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title must be 100 characters or less")]
    TitleTooLong,
    #[error("Description must be 500 characters or less")]
    DescriptionTooLong,
    #[error("Category is required")]
    CategoryRequired,
}

/// Every violation found on one piece of input.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, kind: ValidationError) -> bool {
        self.0.contains(&kind)
    }

    fn push_err(&mut self, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.0.push(e);
        }
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Validate a task title: required, at most 100 characters once trimmed.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

/// Validate an optional description. Absent or empty is always fine.
pub fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    match description {
        Some(d) if d.trim().chars().count() > MAX_DESCRIPTION_LEN => {
            Err(ValidationError::DescriptionTooLong)
        }
        _ => Ok(()),
    }
}

pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        Err(ValidationError::CategoryRequired)
    } else {
        Ok(())
    }
}

/// Run every check that applies to a new task and collect all failures.
pub fn validate_create_input(input: &CreateTaskInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.push_err(validate_title(&input.title));
    errors.push_err(validate_description(input.description.as_deref()));
    errors.push_err(validate_category(&input.category));
    errors.into_result()
}

/// Check only the fields an update actually sets.
pub fn validate_update_input(updates: &UpdateTaskInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if let Some(title) = &updates.title {
        errors.push_err(validate_title(title));
    }
    errors.push_err(validate_description(updates.description.as_deref()));
    if let Some(category) = &updates.category {
        errors.push_err(validate_category(category));
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;

    #[test]
    fn test_title_rules() {
        assert_eq!(validate_title("Buy milk"), Ok(()));
        assert_eq!(validate_title("   "), Err(ValidationError::TitleRequired));
        assert_eq!(validate_title(""), Err(ValidationError::TitleRequired));
        assert_eq!(validate_title(&"a".repeat(100)), Ok(()));
        assert_eq!(validate_title(&"a".repeat(101)), Err(ValidationError::TitleTooLong));
        // Surrounding whitespace does not count towards the limit.
        assert_eq!(validate_title(&format!("  {}  ", "a".repeat(100))), Ok(()));
    }

    #[test]
    fn test_title_length_counts_characters() {
        assert_eq!(validate_title(&"é".repeat(100)), Ok(()));
    }

    #[test]
    fn test_description_rules() {
        assert_eq!(validate_description(None), Ok(()));
        assert_eq!(validate_description(Some("")), Ok(()));
        assert_eq!(validate_description(Some(&"d".repeat(500))), Ok(()));
        assert_eq!(
            validate_description(Some(&"d".repeat(501))),
            Err(ValidationError::DescriptionTooLong)
        );
    }

    #[test]
    fn test_create_input_collects_every_error() {
        let input = CreateTaskInput {
            title: " ".into(),
            description: Some("x".repeat(600)),
            priority: Priority::Low,
            category: "".into(),
            due_date: None,
        };
        let errs = validate_create_input(&input).unwrap_err();
        assert_eq!(
            errs.0,
            vec![
                ValidationError::TitleRequired,
                ValidationError::DescriptionTooLong,
                ValidationError::CategoryRequired
            ]
        );
        assert_eq!(
            errs.to_string(),
            "Title is required; Description must be 500 characters or less; Category is required"
        );
    }

    #[test]
    fn test_errors_behave_as_std_error() {
        let errs = ValidationErrors(vec![ValidationError::TitleTooLong]);
        let boxed: Box<dyn std::error::Error> = Box::new(errs);
        assert_eq!(boxed.to_string(), "Title must be 100 characters or less");
        assert!(boxed.source().is_none());
        assert_eq!(ValidationErrors::default().to_string(), "");
    }

    #[test]
    fn test_update_input_checks_only_set_fields() {
        assert!(validate_update_input(&UpdateTaskInput::default()).is_ok());
        let updates = UpdateTaskInput {
            title: Some("x".repeat(101)),
            ..Default::default()
        };
        assert!(validate_update_input(&updates)
            .unwrap_err()
            .contains(ValidationError::TitleTooLong));
    }
}
