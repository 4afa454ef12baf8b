//! Form validation and normalization shared by every write endpoint.
//!
//! Field rules are declared on the forms with `#[derive(Validate)]`. Forms
//! are normalized (trimmed, blanks cleared) before they are validated, so
//! length rules count the characters that will actually be stored.

use validator::{ValidationErrors, ValidationErrorsKind};

/// Flattens validator output into one user-facing message, ordered by field
/// name so the same input always yields the same text.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let mut messages = Vec::new();
    for (field, kind) in fields {
        if let ValidationErrorsKind::Field(field_errors) = kind {
            for e in field_errors {
                messages.push(
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid ({})", e.code)),
                );
            }
        }
    }
    messages.join(" ")
}

/// Trims every item, drops empties and duplicates, keeps first-seen order.
pub fn normalize_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|seen| seen == item) {
            out.push(item.to_string());
        }
    }
    out
}

/// Empty strings from forms are stored as NULL.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
