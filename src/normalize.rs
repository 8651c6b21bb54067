//! Answer normalization

/// Canonical comparison form: lower-cased with leading/trailing whitespace removed.
#[must_use]
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
