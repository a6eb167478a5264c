//! Idempotency key validation and the cached-response record.
//!
//! Mutating endpoints require clients to send an `Idempotency-Key` header
//! carrying a UUID of their choosing. The first request under a key runs
//! normally and its response is recorded; a retry under the same key gets
//! the recorded response replayed verbatim instead of re-running the
//! handler.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A validated client-supplied idempotency key.
///
/// Syntactically a UUID; the nil (all-zero) UUID is rejected so that a
/// zero-initialized client value never silently aliases real keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Parse a key from a header value.
    ///
    /// Rejects empty/whitespace input, non-UUID input, and the nil UUID.
    pub fn parse(s: &str) -> crate::Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::InvalidIdempotencyKey(
                "key is empty".to_string(),
            ));
        }
        let uuid = Uuid::parse_str(trimmed)
            .map_err(|e| crate::Error::InvalidIdempotencyKey(format!("not a valid UUID: {e}")))?;
        if uuid.is_nil() {
            return Err(crate::Error::InvalidIdempotencyKey(
                "key is the nil UUID".to_string(),
            ));
        }
        Ok(Self(uuid))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Debug for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdempotencyKey({})", self.0)
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded HTTP response eligible for replay.
///
/// Immutable once stored under a key; the replay path reproduces the status
/// code, headers, content type and body exactly as first computed. A blank
/// body means "no body": nothing is written and no content-type is emitted
/// on replay even if one was recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// Original HTTP status code.
    pub status_code: u16,
    /// Serialized response body (may be empty).
    pub body: String,
    /// Content type of the body, if one was recorded.
    pub content_type: Option<String>,
    /// Response headers as (name, values) pairs. Names are matched
    /// case-insensitively per HTTP semantics.
    pub headers: Vec<(String, Vec<String>)>,
}

impl CachedResponse {
    /// Whether the recorded body should be written on replay.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }

    /// Serialize for storage in a replay store.
    pub fn to_store_value(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| crate::Error::Serialization(e.to_string()))
    }

    /// Deserialize a stored value.
    ///
    /// Returns `None` for anything that does not parse as a response record
    /// (empty strings, truncated JSON, values written by other software).
    /// Corruption is a cache miss, not an error.
    pub fn from_store_value(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            return None;
        }
        serde_json::from_str(value).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_valid_uuid() {
        let key = IdempotencyKey::parse("7c9e6679-7425-40de-944b-e07fc1f90ae7").unwrap();
        assert_eq!(key.to_string(), "7c9e6679-7425-40de-944b-e07fc1f90ae7");
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let key = IdempotencyKey::parse("  7c9e6679-7425-40de-944b-e07fc1f90ae7 ").unwrap();
        assert!(!key.as_uuid().is_nil());
    }

    #[test]
    fn parse_rejects_empty_and_whitespace() {
        assert!(IdempotencyKey::parse("").is_err());
        assert!(IdempotencyKey::parse("   ").is_err());
    }

    #[test]
    fn parse_rejects_non_uuid() {
        assert!(IdempotencyKey::parse("not-a-guid").is_err());
    }

    #[test]
    fn parse_rejects_nil_uuid() {
        assert!(IdempotencyKey::parse("00000000-0000-0000-0000-000000000000").is_err());
    }

    #[test]
    fn cached_response_round_trips() {
        let response = CachedResponse {
            status_code: 201,
            body: r#"{"distillery_id":"abc"}"#.to_string(),
            content_type: Some("application/json".to_string()),
            headers: vec![("location".to_string(), vec!["/v1/distilleries/abc".to_string()])],
        };
        let value = response.to_store_value().unwrap();
        let parsed = CachedResponse::from_store_value(&value).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn from_store_value_treats_garbage_as_miss() {
        assert!(CachedResponse::from_store_value("").is_none());
        assert!(CachedResponse::from_store_value("   ").is_none());
        assert!(CachedResponse::from_store_value("7c9e6679-7425-40de-944b-e07fc1f90ae7").is_none());
        assert!(CachedResponse::from_store_value("{\"status_code\":").is_none());
    }

    #[test]
    fn blank_body_means_no_body() {
        let response = CachedResponse {
            status_code: 204,
            body: "  ".to_string(),
            content_type: Some("application/json".to_string()),
            headers: vec![],
        };
        assert!(!response.has_body());
    }
}
