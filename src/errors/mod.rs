//! Error handling module for the catalog client.
//!
//! Provides the centralized error type returned by every data-access operation,
//! with a mapping to the numeric codes the views translate into messages.

use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const HTTP_ERROR: &str = "HTTP_ERROR";
    pub const MISSING_VERSION: &str = "MISSING_VERSION";
    pub const MISSING_ID: &str = "MISSING_ID";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Numeric code reported for failures where no HTTP response was obtained.
pub const NETWORK_ERROR_CODE: i32 = -1;

/// A validation message bound to a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Client error type.
#[derive(Debug)]
pub enum ClientError {
    /// No HTTP response could be obtained (connect, timeout, TLS, ...)
    Network(String),
    /// The server answered with a non-success status
    Http {
        status: u16,
        body: Option<serde_json::Value>,
    },
    /// Update attempted on a record that was never fetched with an ETag
    MissingVersion(Option<String>),
    /// Operation needs a server-assigned identifier
    MissingId,
    /// Local form validation failed
    Validation(Vec<FieldError>),
    /// Response body could not be decoded
    Decode(String),
    /// Invalid client configuration
    Config(String),
}

impl ClientError {
    /// Get the numeric code for this error: the HTTP status, `-1` for
    /// transport failures, `None` for failures that never reached the network.
    pub fn status_code(&self) -> Option<i32> {
        match self {
            ClientError::Network(_) => Some(NETWORK_ERROR_CODE),
            ClientError::Http { status, .. } => Some(i32::from(*status)),
            _ => None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => codes::NETWORK_ERROR,
            ClientError::Http { .. } => codes::HTTP_ERROR,
            ClientError::MissingVersion(_) => codes::MISSING_VERSION,
            ClientError::MissingId => codes::MISSING_ID,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Network(msg) => msg.clone(),
            ClientError::Http { status, body } => match body {
                Some(serde_json::Value::String(text)) => format!("status {}: {}", status, text),
                Some(body) => format!("status {}: {}", status, body),
                None => format!("status {}", status),
            },
            ClientError::MissingVersion(Some(id)) => format!("No version for record {}", id),
            ClientError::MissingVersion(None) => "No version for unsaved record".to_string(),
            ClientError::MissingId => "Record has no identifier".to_string(),
            ClientError::Validation(errors) => errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join(", "),
            ClientError::Decode(msg) => msg.clone(),
            ClientError::Config(msg) => msg.clone(),
        }
    }

    /// Field-level messages carried by a validation failure, either local or
    /// from a structured server error body of the form `{"field": "message"}`.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            ClientError::Validation(errors) => errors.clone(),
            ClientError::Http {
                body: Some(serde_json::Value::Object(map)),
                ..
            } => map
                .iter()
                .map(|(field, message)| {
                    let message = match message {
                        serde_json::Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    FieldError::new(field.clone(), message)
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::error!("Decode error: {:?}", err);
            return ClientError::Decode(format!("Decode error: {}", err));
        }
        if let Some(status) = err.status() {
            return ClientError::Http {
                status: status.as_u16(),
                body: None,
            };
        }
        tracing::error!("Client-side or network error: {:?}", err);
        ClientError::Network(format!("Network error: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_network_error_code() {
        let err = ClientError::Network("connection refused".to_string());
        assert_eq!(err.status_code(), Some(-1));
        assert_eq!(err.error_code(), codes::NETWORK_ERROR);
    }

    #[test]
    fn test_local_errors_have_no_status() {
        assert_eq!(ClientError::MissingId.status_code(), None);
        assert_eq!(ClientError::MissingVersion(None).status_code(), None);
    }

    #[test]
    fn test_field_errors_from_server_body() {
        let err = ClientError::Http {
            status: 400,
            body: Some(json!({ "isbn": "Ungueltige ISBN" })),
        };
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(
            err.field_errors(),
            vec![FieldError::new("isbn", "Ungueltige ISBN")]
        );
    }

    #[test]
    fn test_plain_text_body_has_no_field_errors() {
        let err = ClientError::Http {
            status: 412,
            body: Some(json!("Falsche Versionsnummer")),
        };
        assert!(err.field_errors().is_empty());
        assert_eq!(err.to_string(), "HTTP_ERROR: status 412: Falsche Versionsnummer");
    }
}
