use quiz_core::model::{Quiz, QuizDraft};

use crate::error::SupplyError;

/// Parse and validate a generated quiz payload.
///
/// Tolerates a surrounding Markdown code fence; everything else must be the
/// exact `{ "questions": [...] }` shape.
///
/// # Errors
///
/// `SupplyError::Malformed` for bad JSON or missing fields,
/// `SupplyError::Invalid` when a question breaks a shape rule or the list is empty.
pub fn parse_quiz(raw: &str) -> Result<Quiz, SupplyError> {
    let draft: QuizDraft =
        serde_json::from_str(strip_code_fence(raw)).map_err(SupplyError::Malformed)?;
    Ok(draft.validate()?)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) only when the payload starts on a later line.
    let body = match rest.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with(['{', '[']) => body,
        _ => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
