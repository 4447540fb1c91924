//! Reply payloads and status codes.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::TransportErrorKind;
use crate::protocol::ID_FIELD;

// ============================================================================
// Status Codes
// ============================================================================

/// HTTP status codes used by successful replies.
pub mod status {
    /// Rows returned.
    pub const OK: u16 = 200;
    /// Item added.
    pub const CREATED: u16 = 201;
    /// Update or delete done.
    pub const NO_CONTENT: u16 = 204;
}

// ============================================================================
// Reply
// ============================================================================

/// Payload paired with the HTTP status to send it with.
///
/// An empty body is represented by `Value::Null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    /// Response body.
    pub payload: Value,
    /// HTTP status code.
    pub status: u16,
}

impl Reply {
    /// Rows returned by `list`.
    #[must_use]
    pub fn ok(payload: Value) -> Self {
        Self {
            payload,
            status: status::OK,
        }
    }

    /// `{".id": id}` returned by `create`.
    #[must_use]
    pub fn created(id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self {
            payload: json!({ ID_FIELD: id }),
            status: status::CREATED,
        }
    }

    /// Empty body returned by `update` and `delete`.
    #[must_use]
    pub fn no_content() -> Self {
        Self {
            payload: Value::Null,
            status: status::NO_CONTENT,
        }
    }

    /// Structured transport failure.
    #[must_use]
    pub fn error(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            payload: json!({
                "type": kind.type_name(),
                "message": message,
            }),
            status: kind.status(),
        }
    }

    /// Returns `true` for 2xx replies.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns `true` if the body is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_null()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created() {
        let reply = Reply::created("*1A");
        assert_eq!(reply.status, 201);
        assert_eq!(reply.payload, json!({".id": "*1A"}));
    }

    #[test]
    fn test_no_content_is_empty() {
        let reply = Reply::no_content();
        assert_eq!(reply.status, 204);
        assert!(reply.is_empty());
        assert!(reply.is_success());
    }

    #[test]
    fn test_error_payload() {
        let reply = Reply::error(TransportErrorKind::Timeout, "timed out");
        assert_eq!(reply.status, 503);
        assert!(!reply.is_success());
        assert_eq!(
            reply.payload,
            json!({"type": "transport.Timeout", "message": "timed out"})
        );
    }
}
