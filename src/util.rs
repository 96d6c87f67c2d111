//! Shared utility functions for the Subgate application.

use axum::http::HeaderMap;
use unicode_normalization::UnicodeNormalization;

pub const SECONDS_PER_DAY: i64 = 86400;

/// Normalize an email address for storage and lookup: NFC, trimmed,
/// lowercased. Admin login and receipt/user matching both go through this
/// so the same mailbox always compares equal.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfc().collect::<String>().to_lowercase()
}

/// Extract a Bearer token from the Authorization header.
///
/// Returns the token string without the "Bearer " prefix, or None if
/// the header is missing, malformed, or empty after the prefix.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}
