//! Declarative request validation.
//!
//! Each route declares its rules as a static list; the rules run against the
//! raw JSON body before the handler deserializes it, collecting every failure
//! into a single 400 response with an `errors` array.

use serde_json::Value;

use crate::error::{ApiError, FieldError};

/// A single validation rule: field name, failure message, and a predicate
/// over the raw request body.
pub struct Rule {
    pub field: &'static str,
    pub message: &'static str,
    pub check: fn(&Value) -> bool,
}

/// Rule requiring a field to be present and non-empty.
///
/// Strings must contain a non-whitespace character; arrays must be non-empty;
/// any other non-null value passes.
pub const fn required(field: &'static str, message: &'static str) -> Rule {
    Rule { field, message, check: is_present }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Run every rule against the body, collecting all failures.
pub fn validate(body: &Value, rules: &[Rule]) -> Result<(), ApiError> {
    let errors: Vec<FieldError> = rules
        .iter()
        .filter(|rule| !(rule.check)(body.get(rule.field).unwrap_or(&Value::Null)))
        .map(|rule| FieldError::new(rule.field, rule.message))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_failed(errors))
    }
}
