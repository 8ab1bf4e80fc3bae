//! Field validation shared by every handler that accepts a JSON body.
//!
//! Request payloads keep their fields as raw JSON values so that missing and
//! wrongly typed input is reported uniformly as `{"errors": [...]}` instead of
//! being rejected by the deserializer.

use serde_json::Value;

use crate::db::models::DocumentStatus;
use crate::error::AppError;
use crate::taxonomy::normalize_key;

/// Collects field errors across a whole payload before failing.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_error(self) -> AppError {
        AppError::Validation(self.errors)
    }

    /// `Ok(value)` when no error was recorded, a validation error otherwise.
    pub fn finish<T>(self, value: T) -> Result<T, AppError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.into_error())
        }
    }
}

/// A JSON value counts as supplied unless it is absent or `null`.
pub fn is_supplied(value: &Option<Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

/// A required, non-empty string field, returned exactly as sent. Records an
/// error and returns `None` when the field is missing, blank, or not a string.
pub fn required_string(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.push(format!("{field} is required"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(format!("{field} is required"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(format!("{field} must be a string"));
            None
        }
    }
}

/// A required category key, normalized to lowercase.
pub fn required_category(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<String> {
    required_string(errors, field, value).map(|s| normalize_key(&s))
}

/// A required publication status.
pub fn required_status(errors: &mut FieldErrors, value: Option<&Value>) -> Option<DocumentStatus> {
    let raw = required_string(errors, "status", value)?;
    let status = DocumentStatus::from_str_ci(&raw);
    if status.is_none() {
        errors.push(format!(
            "status must be one of: {}",
            DocumentStatus::ALL.map(|s| s.as_str()).join(", ")
        ));
    }
    status
}

/// Optional link. Absent or non-string input becomes an empty string; a
/// non-empty string must be an absolute `http` or `https` URL.
pub fn optional_url(errors: &mut FieldErrors, value: Option<&Value>) -> String {
    let Some(Value::String(raw)) = value else {
        return String::new();
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => raw.to_string(),
        Ok(parsed) => {
            errors.push(format!("url must use http or https, got '{}'", parsed.scheme()));
            String::new()
        }
        Err(e) => {
            errors.push(format!("url is not a valid URL: {e}"));
            String::new()
        }
    }
}

/// Tag list. Non-array input becomes empty; non-string and blank entries are
/// dropped.
pub fn tag_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Presence check for a field that must exist even though its content is
/// normalized leniently (e.g. `tags`).
pub fn require_present(errors: &mut FieldErrors, field: &str, value: &Option<Value>) -> bool {
    if is_supplied(value) {
        true
    } else {
        errors.push(format!("{field} is required"));
        false
    }
}

/// A required array of strings.
pub fn required_string_array(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<Vec<String>> {
    match value {
        None | Some(Value::Null) => {
            errors.push(format!("{field} is required"));
            None
        }
        Some(Value::Array(items)) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect();
            if strings.is_none() {
                errors.push(format!("{field} must contain only strings"));
            }
            strings
        }
        Some(_) => {
            errors.push(format!("{field} must be an array of strings"));
            None
        }
    }
}
