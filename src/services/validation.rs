use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

pub const DECK_NAME_MAX_CHARS: usize = 100;
pub const DECK_DESCRIPTION_MAX_CHARS: usize = 500;
pub const CARD_TEXT_MAX_CHARS: usize = 1000;

/// A single rejected input field. Serialized as `{"path", "msg"}`, the shape
/// the web client already renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "path")]
    pub field: String,
    #[serde(rename = "msg")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Collects field errors for one request so every problem is reported at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims `value` and checks it is non-empty and at most `max` characters.
    /// Returns the trimmed text; an error is recorded under `field` otherwise.
    pub fn required_text(
        &mut self,
        field: &str,
        label: &str,
        value: Option<&str>,
        max: usize,
    ) -> String {
        let trimmed = value.unwrap_or_default().trim();

        if trimmed.is_empty() {
            self.errors
                .push(FieldError::new(field, format!("{} is required", label)));
        } else if trimmed.chars().count() > max {
            self.errors.push(FieldError::new(
                field,
                format!("{} cannot exceed {} characters", label, max),
            ));
        }

        trimmed.to_string()
    }

    /// Like [`Validator::required_text`] but an absent or blank value is
    /// accepted and yields an empty string.
    pub fn optional_text(
        &mut self,
        field: &str,
        label: &str,
        value: Option<&str>,
        max: usize,
    ) -> String {
        let trimmed = value.unwrap_or_default().trim();

        if trimmed.chars().count() > max {
            self.errors.push(FieldError::new(
                field,
                format!("{} cannot exceed {} characters", label, max),
            ));
        }

        trimmed.to_string()
    }

    /// Checks that a reference field is present and is a well-formed id.
    pub fn required_id(
        &mut self,
        field: &str,
        label: &str,
        invalid_message: &str,
        value: Option<&str>,
    ) -> Option<Uuid> {
        let raw = value.unwrap_or_default().trim();

        if raw.is_empty() {
            self.errors
                .push(FieldError::new(field, format!("{} is required", label)));
            return None;
        }

        match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                self.errors.push(FieldError::new(field, invalid_message));
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// Parses a path identifier, reporting `what` (e.g. "deck") when malformed
pub fn parse_id(raw: &str, what: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidIdentifier(what))
}
