//! Shared types for the notes service and its HTTP clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Request Types
// =====================================================

/// Body of `POST /notes`
///
/// Both fields are optional at the wire level so the service can answer a
/// missing title with its own error instead of a parser error.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Body of `PUT /notes/{id}`
///
/// `None` (key absent or `null`) keeps the stored value.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

// =====================================================
// Response Types
// =====================================================

/// Error body shared by every non-2xx response: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =====================================================
// Domain Types
// =====================================================

/// A stored note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub body: String,
    /// UTC, `YYYY-MM-DD HH:MM:SS`, assigned by the store at insert time
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_missing_and_null_are_none() {
        let req: UpdateNoteRequest = serde_json::from_str(r#"{"body": null}"#).unwrap();
        assert!(req.title.is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn test_update_request_keeps_explicit_empty_string() {
        let req: UpdateNoteRequest = serde_json::from_str(r#"{"body": ""}"#).unwrap();
        assert_eq!(req.body.as_deref(), Some(""));
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_value(ErrorResponse::new("Note not found")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Note not found" }));
    }
}
