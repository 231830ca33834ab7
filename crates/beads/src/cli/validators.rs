//! CLI input validation functions.
//!
//! Used by clap's `value_parser` attribute so bad input fails at parse time
//! with a specific message.

use crate::domain::MAX_TITLE_LENGTH;

/// Validate an issue ID prefix.
///
/// Delegates to the domain validator in `commands::init` so there is a
/// single source of truth for the rules.
pub fn validate_prefix(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    crate::commands::init::validate_prefix(trimmed).map_err(|e| e.to_string())?;
    Ok(trimmed.to_string())
}

/// Validate issue ID format: `prefix-suffix`.
///
/// The prefix follows the repository prefix rules; the suffix is one or
/// more alphanumeric characters (counter IDs are plain integers, but IDs
/// imported from other tools may carry letters).
pub fn validate_issue_id(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Issue ID cannot be empty".to_string());
    }

    let Some((prefix, suffix)) = s.split_once('-') else {
        return Err(format!(
            "Invalid issue ID format: '{s}'. Expected format: prefix-suffix (e.g., beads-42)"
        ));
    };

    validate_prefix(prefix).map_err(|e| format!("Issue ID {}", e.to_lowercase()))?;

    if suffix.is_empty() {
        return Err("Issue ID suffix cannot be empty".to_string());
    }
    if !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Issue ID suffix must contain only alphanumeric characters".to_string());
    }

    Ok(s.to_string())
}

/// Validate title: non-empty, single line, within length limit.
pub fn validate_title(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if s.len() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title cannot exceed {MAX_TITLE_LENGTH} characters, got {}",
            s.len()
        ));
    }
    if s.contains('\n') || s.contains('\r') {
        return Err("Title cannot contain newline characters".to_string());
    }

    Ok(s.to_string())
}

/// Validate a free-text field: newlines allowed, control characters not.
pub fn validate_text(s: &str) -> Result<String, String> {
    if let Some(pos) = s.chars().position(|c| {
        let code = c as u32;
        (code < 0x20 && code != 0x09 && code != 0x0A && code != 0x0D)
            || (0x7F..=0x9F).contains(&code)
    }) {
        return Err(format!(
            "Text contains invalid control character at position {pos}"
        ));
    }

    Ok(s.to_string())
}
