//! Input rules shared by the services. Nothing in here touches a repository.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::common::CoreError;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

static HASHTAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#(\w+)").expect("hashtag pattern is valid"));

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 8;

/// Rejects blank text and text longer than `max` characters.
///
/// `label` is the subject used in the error messages, e.g. `"Post content"`.
pub fn validate_text(label: &str, text: &str, max: usize) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::validation(format!("{label} cannot be empty")));
    }

    if text.chars().count() > max {
        return Err(CoreError::validation(format!(
            "{label} exceeds maximum length of {max} characters"
        )));
    }

    Ok(())
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    let length = username.chars().count();
    (USERNAME_MIN..=USERNAME_MAX).contains(&length)
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// At least 8 characters with one uppercase letter and one digit.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Strips everything but alphanumerics, whitespace and `_-.@` from a search keyword.
pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '.' | '@'))
        .collect()
}

/// Distinct, lowercased hashtags in order of first appearance, without the `#`.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for capture in HASHTAG_PATTERN.captures_iter(content) {
        let tag = capture[1].to_lowercase();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

pub fn normalize_hashtag(tag: &str) -> String {
    let trimmed = tag.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed).to_lowercase()
}
