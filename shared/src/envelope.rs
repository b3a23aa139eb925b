//! Uniform result envelope returned by every gateway mutation
//!
//! The outer API layer forwards this shape verbatim; `type` and `message`
//! match the wire contract of the legacy resolvers, `error` adds a typed
//! discriminant so callers no longer have to parse the message text.

use serde::{Deserialize, Serialize};

/// Envelope discriminant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    Success,
    Error,
}

/// Error classification carried by `ERROR` envelopes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Referenced order, line item, menu item or table is absent
    NotFound,
    /// Non-positive quantity, malformed identifier, rejected transition
    InvalidInput,
    /// Create with an identifier already in use
    DuplicateIdentifier,
    /// Propagated from the external auth context
    Unauthorized,
    /// Underlying store failed; message is generic, details go to the log
    PersistenceFailure,
}

/// Result envelope: `{type, message, content}` plus the typed `error` kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl<T> Envelope<T> {
    pub fn success(content: T, message: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Success,
            message: message.into(),
            content: Some(content),
            error: None,
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            message: message.into(),
            content: None,
            error: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.response_type == ResponseType::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_serializes_wire_shape() {
        let env = Envelope::success(42, "Order added");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["type"], "SUCCESS");
        assert_eq!(json["message"], "Order added");
        assert_eq!(json["content"], 42);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn error_envelope_carries_kind() {
        let env: Envelope<()> = Envelope::error(ErrorKind::NotFound, "Order not found: 7");
        assert!(!env.is_success());
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["type"], "ERROR");
        assert_eq!(json["error"], "NOT_FOUND");
        assert!(json.get("content").is_none());
    }
}
