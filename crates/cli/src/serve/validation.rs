//! Input validation for `POST /texts`.

use serde_json::Value;
use textstat_core::MAX_TEXT_LENGTH;

use super::error::FieldError;

/// Extract the trimmed `text` field from a create-request body.
///
/// Unknown fields are ignored. On failure every problem found is returned,
/// each tagged with the offending field.
pub(crate) fn validate_create_text(body: &Value) -> Result<String, Vec<FieldError>> {
    let Some(object) = body.as_object() else {
        return Err(vec![FieldError::new("text", "Text is required")]);
    };

    let text = match object.get("text") {
        None | Some(Value::Null) => {
            return Err(vec![FieldError::new("text", "Text is required")]);
        }
        Some(Value::String(text)) => text.trim(),
        Some(_) => return Err(vec![FieldError::new("text", "Text must be a string")]),
    };

    if text.is_empty() {
        return Err(vec![FieldError::new("text", "Text cannot be empty")]);
    }
    if text.encode_utf16().count() > MAX_TEXT_LENGTH {
        return Err(vec![FieldError::new(
            "text",
            format!("Text cannot exceed {MAX_TEXT_LENGTH} characters"),
        )]);
    }

    Ok(text.to_string())
}
