//! Errors from the REST client.

use std::fmt;

use serde_json::Value;

/// Body of a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// Parsed because the response declared `application/json`.
    Json(Value),
    Text(String),
}

impl ErrorBody {
    /// Build from a raw body and the response content type.
    ///
    /// A JSON content type whose body fails to parse falls back to text.
    pub fn from_response(content_type: Option<&str>, text: String) -> Self {
        let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            return Self::Text(text);
        }
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    /// The backend's `detail` message, if the body carries one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Json(value) => value.get("detail").and_then(Value::as_str),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(detail) = self.detail() {
            return f.write_str(detail);
        }
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text.trim()),
        }
    }
}

/// Errors from the indexing backend API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("API error {status} {status_text}: {body}")]
    Status {
        status: u16,
        status_text: String,
        body: ErrorBody,
    },

    /// The request never produced a response (connect, DNS, TLS, timeout).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body does not have the expected shape.
    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body_requires_json_content_type() {
        let body = ErrorBody::from_response(
            Some("application/json; charset=utf-8"),
            r#"{"detail":"Asset not found"}"#.to_string(),
        );
        assert_eq!(body, ErrorBody::Json(json!({"detail": "Asset not found"})));
        assert_eq!(body.detail(), Some("Asset not found"));

        let body = ErrorBody::from_response(Some("text/plain"), r#"{"detail":"x"}"#.to_string());
        assert!(matches!(body, ErrorBody::Text(_)));
    }

    #[test]
    fn test_malformed_json_falls_back_to_text() {
        let body = ErrorBody::from_response(Some("application/json"), "<html>".to_string());
        assert_eq!(body, ErrorBody::Text("<html>".to_string()));
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            body: ErrorBody::Text("NAS offline\n".to_string()),
        };
        assert_eq!(err.to_string(), "API error 503 Service Unavailable: NAS offline");
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_not_found());
    }
}
