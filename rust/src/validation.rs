//! Structural validation for public feedback submissions.
//!
//! The payload arrives as raw JSON so that every rejection message is owned
//! here rather than by the deserializer. Unknown fields are stripped by
//! construction: only the five known fields are ever read.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::models::ValidatedFeedback;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_MESSAGE_LEN: usize = 2000;

// Syntactic check only: something@something.tld with no whitespace.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Validate one untrusted submission body.
///
/// Collects every violated constraint instead of stopping at the first, so
/// the caller can report them all at once.
pub fn validate_submission(payload: &Value) -> Result<ValidatedFeedback, Vec<String>> {
    let mut errors = Vec::new();

    let rating = validate_rating(payload.get("rating"), &mut errors);
    let message = validate_message(payload.get("message"), &mut errors);
    let name = validate_optional_text(payload.get("name"), "name", MAX_NAME_LEN, &mut errors);
    let email = validate_email(payload.get("email"), &mut errors);
    let metadata = validate_metadata(payload.get("metadata"), &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedFeedback {
        name,
        email,
        rating: rating.unwrap_or_default(),
        message: message.unwrap_or_default(),
        metadata: metadata.unwrap_or_else(|| Value::Object(Default::default())),
    })
}

fn validate_rating(value: Option<&Value>, errors: &mut Vec<String>) -> Option<i32> {
    let value = match value {
        None | Some(Value::Null) => {
            errors.push("\"rating\" is required".to_string());
            return None;
        }
        Some(v) => v,
    };

    let Some(rating) = value.as_i64() else {
        errors.push("\"rating\" must be an integer".to_string());
        return None;
    };

    if !(1..=5).contains(&rating) {
        errors.push("\"rating\" must be between 1 and 5".to_string());
        return None;
    }

    Some(rating as i32)
}

fn validate_message(value: Option<&Value>, errors: &mut Vec<String>) -> Option<String> {
    let value = match value {
        None | Some(Value::Null) => {
            errors.push("\"message\" is required".to_string());
            return None;
        }
        Some(v) => v,
    };

    let Some(message) = value.as_str() else {
        errors.push("\"message\" must be a string".to_string());
        return None;
    };

    if message.is_empty() {
        errors.push("\"message\" is not allowed to be empty".to_string());
        return None;
    }

    if message.chars().count() > MAX_MESSAGE_LEN {
        errors.push(format!(
            "\"message\" length must be less than or equal to {MAX_MESSAGE_LEN} characters long"
        ));
        return None;
    }

    Some(message.to_string())
}

fn validate_optional_text(
    value: Option<&Value>,
    field: &str,
    max_len: usize,
    errors: &mut Vec<String>,
) -> Option<String> {
    let value = match value {
        None | Some(Value::Null) => return None,
        Some(v) => v,
    };

    let Some(text) = value.as_str() else {
        errors.push(format!("\"{field}\" must be a string"));
        return None;
    };

    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.chars().count() > max_len {
        errors.push(format!(
            "\"{field}\" length must be less than or equal to {max_len} characters long"
        ));
        return None;
    }

    Some(text.to_string())
}

fn validate_email(value: Option<&Value>, errors: &mut Vec<String>) -> Option<String> {
    let email = validate_optional_text(value, "email", MAX_EMAIL_LEN, errors)?;

    if !EMAIL_RE.is_match(&email) {
        errors.push("\"email\" must be a valid email".to_string());
        return None;
    }

    Some(email)
}

fn validate_metadata(value: Option<&Value>, errors: &mut Vec<String>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(v @ Value::Object(_)) => Some(v.clone()),
        Some(_) => {
            errors.push("\"metadata\" must be of type object".to_string());
            None
        }
    }
}
