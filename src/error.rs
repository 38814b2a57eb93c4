//! Error types for skope-client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde_json::Value;
use thiserror::Error;

/// The main error type for skope-client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Envelope Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Invalid {entity} data, {len} bytes is below the minimum payload size")]
    PayloadTooShort { entity: &'static str, len: usize },

    #[error("Failed to unpack {entity}, attributes not found")]
    MissingAttributes { entity: &'static str },

    #[error("Request failed with status '{status}': {message}")]
    RequestFailed { status: String, message: String },

    #[error("Pagination stopped after {max_pages} full pages")]
    MaxPagesExceeded { max_pages: u32 },

    // ============================================================================
    // Schema Errors
    // ============================================================================
    #[error("Failed to unpack {entity}, unsupported attribute: {key}, {value}")]
    UnsupportedAttribute {
        entity: &'static str,
        key: String,
        value: Value,
    },

    #[error("Failed to unpack {entity}, attribute {key} must be {expected}, got {value}")]
    TypeMismatch {
        entity: &'static str,
        key: String,
        expected: &'static str,
        value: Value,
    },

    #[error("Failed to unpack {entity}, {field} attribute error: {source}")]
    Nested {
        entity: &'static str,
        field: String,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Wrap an error raised while decoding a nested attribute
    pub fn nested(entity: &'static str, field: impl Into<String>, source: Error) -> Self {
        Self::Nested {
            entity,
            field: field.into(),
            source: Box::new(source),
        }
    }

    /// True for failures caused by the payload shape rather than the transport
    pub fn is_schema_error(&self) -> bool {
        match self {
            Error::UnsupportedAttribute { .. } | Error::TypeMismatch { .. } => true,
            Error::Nested { source, .. } => source.is_schema_error(),
            _ => false,
        }
    }

    /// Walk nested wrappers down to the error that started the failure
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for skope-client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("token");
        assert_eq!(err.to_string(), "Missing required config field: token");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_unsupported_attribute_display() {
        let err = Error::UnsupportedAttribute {
            entity: "ClientEndpoint",
            key: "bogus_field".to_string(),
            value: json!(1),
        };
        assert_eq!(
            err.to_string(),
            "Failed to unpack ClientEndpoint, unsupported attribute: bogus_field, 1"
        );
    }

    #[test]
    fn test_nested_error_names_parent_field() {
        let inner = Error::UnsupportedAttribute {
            entity: "Host",
            key: "cpu".to_string(),
            value: json!("arm64"),
        };
        let err = Error::nested("ClientEndpoint", "host_info", inner);

        let msg = err.to_string();
        assert!(msg.contains("host_info attribute error"));
        assert!(msg.contains("unsupported attribute: cpu"));
        assert!(err.is_schema_error());
        assert!(matches!(
            err.root_cause(),
            Error::UnsupportedAttribute { key, .. } if key == "cpu"
        ));
    }

    #[test]
    fn test_is_schema_error() {
        assert!(!Error::decode("bad json").is_schema_error());
        assert!(!Error::http_status(500, "").is_schema_error());
        assert!(Error::TypeMismatch {
            entity: "Event",
            key: "timestamp".to_string(),
            expected: "a number",
            value: json!("yesterday"),
        }
        .is_schema_error());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
