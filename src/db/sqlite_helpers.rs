//! SQLite helper utilities for type conversion
//!
//! SQLite has no native UUID or array types, so ids are stored as TEXT and
//! string sets as JSON arrays in TEXT columns.

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

// ============================================================================
// ID Helpers
// ============================================================================

/// Generate a new record id
#[inline]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// Array/Vec Helpers (stored as JSON strings in SQLite)
// ============================================================================

/// Serialize a Vec to a JSON string for SQLite storage
#[inline]
pub fn vec_to_json<T: Serialize>(v: &[T]) -> String {
    serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string())
}

/// Deserialize a JSON string from SQLite to a Vec
#[inline]
pub fn json_to_vec<T: DeserializeOwned>(s: &str) -> Vec<T> {
    serde_json::from_str(s).unwrap_or_default()
}

// ============================================================================
// Timestamp Helpers (stored as ISO8601 TEXT in SQLite)
// ============================================================================

/// Get current UTC timestamp as ISO8601 string for SQLite
#[inline]
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_vec_tolerates_garbage() {
        let parsed: Vec<String> = json_to_vec("not json");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_vec_to_json() {
        let genres = vec!["crime".to_string(), "classic".to_string()];
        assert_eq!(vec_to_json(&genres), r#"["crime","classic"]"#);
        assert_eq!(json_to_vec::<String>(&vec_to_json(&genres)), genres);
    }
}
