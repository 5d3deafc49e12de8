use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collected per-field failures for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

/// Length checks count characters, not bytes, so accented titles are not
/// penalised.
pub fn check_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        if min == 0 {
            errors.add(field, format!("must be at most {} characters", max));
        } else {
            errors.add(
                field,
                format!("must be between {} and {} characters", min, max),
            );
        }
    }
}

/// Trims a required text field, recording an error when it is missing or blank.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.add(field, "is required");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_field_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "is required");
        errors.add("maxCapacity", "must be at least 1");
        assert_eq!(
            errors.to_string(),
            "title: is required; maxCapacity: must be at least 1"
        );
        assert!(errors.has_field("maxCapacity"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_check_length_counts_chars() {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "title", "Graduação", 3, 9);
        assert!(errors.is_empty());

        check_length(&mut errors, "title", "ab", 3, 200);
        assert_eq!(errors.errors()[0].message, "must be between 3 and 200 characters");
    }

    #[test]
    fn test_required_text_rejects_blank() {
        let mut errors = ValidationErrors::new();
        assert_eq!(required_text(&mut errors, "location", Some("   ".into())), None);
        assert_eq!(required_text(&mut errors, "organizer", None), None);
        assert_eq!(
            required_text(&mut errors, "title", Some("  Feira  ".into())),
            Some("Feira".to_string())
        );
        assert_eq!(errors.errors().len(), 2);
    }

    #[test]
    fn test_serializes_as_list() {
        let errors = ValidationErrors::single("eventDate", "must be in the future");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "eventDate", "message": "must be in the future" }])
        );
    }
}
