//! Field-scoped validation errors shared by the moderation and slug rules.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::domain::moderation::WARNING;
use crate::domain::slug::SLUG_CONFLICT_SUFFIX;

/// Key used for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// A business-rule rejection of submitted content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The text contains a banned word.
    #[error("{warning}", warning = WARNING)]
    ContentRejected,

    /// An explicit (or derived) slug is already taken.
    #[error("{slug}{suffix}", suffix = SLUG_CONFLICT_SUFFIX)]
    IdentifierConflict { slug: String },

    /// Any other field-level rule.
    #[error("{message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    /// Form field the error must be attached to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::ContentRejected => "text",
            ValidationError::IdentifierConflict { .. } => "slug",
            ValidationError::Invalid { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// `None` for non-field errors.
    pub field: Option<String>,
    pub message: String,
}

/// Ordered collection of form errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn non_field(message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field: None,
            message: message.into(),
        }])
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: Some(field.into()),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages attached to `field`, in insertion order.
    pub fn for_field(&self, field: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|e| e.field.as_deref() == Some(field))
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn non_field_errors(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|e| e.field.is_none())
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for error in &self.0 {
            let key = error.field.as_deref().unwrap_or(NON_FIELD_ERRORS);
            let entry = map
                .entry(key.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = entry {
                items.push(Value::String(error.message.clone()));
            }
        }
        Value::Object(map)
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            match &error.field {
                Some(field) => write!(f, "{field}: {}", error.message)?,
                None => f.write_str(&error.message)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

impl From<ValidationError> for FormErrors {
    fn from(error: ValidationError) -> Self {
        FormErrors::field(error.field(), error.to_string())
    }
}

impl From<validator::ValidationErrors> for FormErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut form_errors = FormErrors::new();
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                form_errors.add(field.to_string(), message);
            }
        }
        form_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_rejected_message_and_field() {
        let err = ValidationError::ContentRejected;
        assert_eq!(err.to_string(), WARNING);
        assert_eq!(err.field(), "text");
    }

    #[test]
    fn test_identifier_conflict_message_names_slug() {
        let err = ValidationError::IdentifierConflict {
            slug: "new_slug".to_string(),
        };
        assert_eq!(err.to_string(), format!("new_slug{SLUG_CONFLICT_SUFFIX}"));
        assert_eq!(err.field(), "slug");
    }

    #[test]
    fn test_form_errors_grouping() {
        let mut errors = FormErrors::field("title", "Обязательное поле.");
        errors.add("slug", "taken");
        errors.add("title", "too long");

        assert_eq!(errors.for_field("title"), vec!["Обязательное поле.", "too long"]);
        assert_eq!(errors.for_field("slug"), vec!["taken"]);
        assert!(errors.for_field("text").is_empty());
        assert!(errors.non_field_errors().is_empty());

        let json = errors.to_json();
        assert_eq!(json["title"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_non_field_errors() {
        let errors = FormErrors::non_field("bad credentials");
        assert_eq!(errors.non_field_errors(), vec!["bad credentials"]);
        assert_eq!(errors.to_json()[NON_FIELD_ERRORS][0], "bad credentials");
        assert_eq!(errors.to_string(), "bad credentials");
    }
}
