//! Input validation for certificate requests.
//!
//! Every problem is collected before the request is rejected, so callers see
//! the whole list at once.

use std::fmt;

/// Validation error with a user-facing message.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create error for empty required field
    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must not be empty", label))
            .with_suggestion(format!("Provide a value for {}", label.to_lowercase()))
    }

    pub fn missing_milestone_hours(field: &str) -> Self {
        Self::new(field, "Milestone certificates require an hours value")
            .with_suggestion("Set milestoneHours to a positive whole number, e.g. 100")
    }

    pub fn non_positive(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must be greater than zero", label))
    }

    pub fn empty_selection(field: &str) -> Self {
        Self::new(field, "No recipients selected")
            .with_suggestion("Select at least one volunteer before generating certificates")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} problem(s) found",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.join("\n")
    }

    /// Convert to Result - Ok if no errors, Err with formatted message if errors exist
    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Validate that milestone hours are present and positive
pub fn validate_milestone_hours(value: Option<u32>, field: &str, errors: &mut ValidationErrors) {
    match value {
        None => errors.add(ValidationError::missing_milestone_hours(field)),
        Some(0) => errors.add(ValidationError::non_positive(field, "Milestone hours")),
        Some(_) => {}
    }
}

/// Validate that at least one recipient is selected
pub fn validate_selection<T>(selection: &[T], field: &str, errors: &mut ValidationErrors) {
    if selection.is_empty() {
        errors.add(ValidationError::empty_selection(field));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_all_errors() {
        let mut errors = ValidationErrors::new();
        validate_required("  ", "organizerName", "Organizer name", &mut errors);
        validate_milestone_hours(None, "milestoneHours", &mut errors);
        validate_selection::<u8>(&[], "volunteers", &mut errors);

        assert_eq!(errors.len(), 3);
        let message = errors.into_result().unwrap_err();
        assert!(message.contains("3 problem(s)"));
        assert!(message.contains("[milestoneHours]"));
        assert!(message.contains("[volunteers] No recipients selected"));
    }

    #[test]
    fn test_zero_hours_rejected() {
        let mut errors = ValidationErrors::new();
        validate_milestone_hours(Some(0), "milestoneHours", &mut errors);
        assert!(errors.to_message().contains("greater than zero"));
    }

    #[test]
    fn test_valid_input_passes() {
        let mut errors = ValidationErrors::new();
        validate_required("Marcus", "organizerName", "Organizer name", &mut errors);
        validate_milestone_hours(Some(50), "milestoneHours", &mut errors);
        validate_selection(&[1], "volunteers", &mut errors);
        assert!(errors.into_result().is_ok());
    }
}
