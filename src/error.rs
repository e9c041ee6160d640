//! Error types for shopclean
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for shopclean
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
    // Storage Errors
    // ============================================================================
    #[error("Storage credentials rejected during {operation} on '{path}': {message}")]
    Auth {
        operation: String,
        path: String,
        message: String,
    },

    #[error("Object not found: {path}")]
    NotFound { path: String },

    #[error("Storage {operation} failed on '{path}': {message}")]
    Storage {
        operation: String,
        path: String,
        message: String,
    },

    #[error("Storage does not support {operation}: {message}")]
    Unsupported { operation: String, message: String },

    #[error("Max retries ({max_retries}) exceeded for {operation} on '{path}': {message}")]
    MaxRetriesExceeded {
        max_retries: u32,
        operation: String,
        path: String,
        message: String,
    },

    #[error("Run timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode input: {message}")]
    Decode { message: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

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

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
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

    /// Create a credential error
    pub fn auth(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Auth {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Storage {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Storage { .. } | Error::Io(_))
    }

    /// Check if this error means the credentials are unusable
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth { .. })
    }
}

impl From<object_store::Error> for Error {
    fn from(err: object_store::Error) -> Self {
        classify_store_error("request", "", err)
    }
}

/// Map an object store error onto the crate taxonomy
///
/// Credential problems are never retried, missing objects are reported as
/// such, and everything else is treated as a transient storage failure.
pub fn classify_store_error(operation: &str, location: &str, err: object_store::Error) -> Error {
    match err {
        object_store::Error::NotFound { path, .. } => Error::NotFound { path },
        object_store::Error::Unauthenticated { path, source } => {
            Error::auth(operation, path, source.to_string())
        }
        object_store::Error::PermissionDenied { path, source } => {
            Error::auth(operation, path, source.to_string())
        }
        object_store::Error::UnknownConfigurationKey { store, key } => {
            Error::config(format!("Unknown {store} configuration key: {key}"))
        }
        object_store::Error::NotImplemented => Error::Unsupported {
            operation: operation.to_string(),
            message: "not implemented by this store".to_string(),
        },
        object_store::Error::NotSupported { source } => Error::Unsupported {
            operation: operation.to_string(),
            message: source.to_string(),
        },
        object_store::Error::InvalidPath { source } => {
            Error::config(format!("Invalid object path: {source}"))
        }
        other => Error::storage(operation, location, other.to_string()),
    }
}

/// Result type alias for shopclean
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

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("job_name");
        assert_eq!(err.to_string(), "Missing required config field: job_name");

        let err = Error::storage("get", "raw/a.jsonl", "connection reset");
        assert_eq!(
            err.to_string(),
            "Storage get failed on 'raw/a.jsonl': connection reset"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::storage("list", "raw", "503").is_retryable());
        assert!(Error::Io(std::io::Error::other("reset")).is_retryable());

        assert!(!Error::auth("list", "raw", "bad key").is_retryable());
        assert!(!Error::NotFound {
            path: "raw/a.jsonl".into()
        }
        .is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_classify_store_error() {
        let err = classify_store_error(
            "get",
            "raw/x",
            object_store::Error::NotFound {
                path: "raw/x".into(),
                source: "missing".into(),
            },
        );
        assert!(matches!(err, Error::NotFound { ref path } if path == "raw/x"));

        let err = classify_store_error(
            "list",
            "raw",
            object_store::Error::Unauthenticated {
                path: "raw".into(),
                source: "expired token".into(),
            },
        );
        assert!(err.is_auth());
        assert!(!err.is_retryable());

        let err = classify_store_error(
            "put",
            "out/part.csv",
            object_store::Error::Generic {
                store: "S3",
                source: "slow down".into(),
            },
        );
        assert!(err.is_retryable());
        assert!(err.to_string().contains("out/part.csv"));
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
