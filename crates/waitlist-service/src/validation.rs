//! Stateless input checks run before any storage access.

use std::sync::LazyLock;

use regex::Regex;

use waitlist_core::types::Locale;

/// Longest email accepted, per RFC 5321 path limits.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Longest social handle accepted or stored.
pub const MAX_SOCIAL_LENGTH: usize = 100;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static SOCIAL_EN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[A-Za-z0-9_]{2,}$").expect("social pattern is valid"));

static SOCIAL_RU_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@[A-Za-z0-9_\x{0400}-\x{04FF}]{2,}$").expect("social pattern is valid")
});

/// Whether `value` looks like `local@domain.tld`.
pub fn validate_email(value: &str) -> bool {
    !value.is_empty() && value.len() <= MAX_EMAIL_LENGTH && EMAIL_PATTERN.is_match(value)
}

/// Whether `value` is an acceptable handle for `locale`.
///
/// Russian handles may also use Cyrillic letters. An empty handle is
/// valid because the field is optional.
pub fn validate_social_handle(value: &str, locale: Locale) -> bool {
    if value.is_empty() {
        return true;
    }
    if value.chars().count() > MAX_SOCIAL_LENGTH {
        return false;
    }
    match locale {
        Locale::En => SOCIAL_EN_PATTERN.is_match(value),
        Locale::Ru => SOCIAL_RU_PATTERN.is_match(value),
    }
}

/// Trim and truncate a handle for storage; `None` when nothing is left.
pub fn sanitize_social_handle(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_SOCIAL_LENGTH).collect())
}

/// Whether `value` names a supported locale.
pub fn validate_locale(value: &str) -> bool {
    Locale::ALL.iter().any(|locale| locale.as_str() == value)
}
