//! Standardized API response types (RFC 7807 compliant for errors).

use serde::{Deserialize, Serialize};

/// Acknowledgement envelope: a message and, optionally, the affected resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// The text clients display and match on: the detail when present,
    /// otherwise the title.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            error_type: "about:blank".to_string(),
            message: title.clone(),
            title,
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.message = detail.clone();
        self.detail = Some(detail);
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(401, "Unauthorized").with_detail(detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(403, "Forbidden").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, "Conflict").with_detail(detail)
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(500, "Internal Server Error").with_detail(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_mirrors_detail() {
        let json = serde_json::to_value(
            ErrorResponse::new(401, "Token Expired")
                .with_detail("The session ended. Please reconnect"),
        )
        .unwrap();

        assert_eq!(json["message"], "The session ended. Please reconnect");
        assert_eq!(json["detail"], json["message"]);
        assert_eq!(json["status"], 401);
        assert_eq!(json["type"], "about:blank");
    }

    #[test]
    fn test_error_message_falls_back_to_title() {
        let json = serde_json::to_value(ErrorResponse::new(404, "Not Found")).unwrap();

        assert_eq!(json["message"], "Not Found");
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn test_acknowledgement_omits_empty_data() {
        let json = serde_json::to_value(ApiResponse::message("Post deleted successfully")).unwrap();

        assert_eq!(json["message"], "Post deleted successfully");
        assert!(json.get("data").is_none());
    }
}
