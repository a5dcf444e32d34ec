//! Global error types for the Pushwoosh client.
//!
//! All error categories across the client crates are unified into a single
//! `PwError` enum with conversions from underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using PwError.
pub type PwResult<T> = Result<T, PwError>;

/// Unified error type covering all error categories in the Pushwoosh client.
#[derive(Error, Debug)]
pub enum PwError {
    // -- Configuration errors --
    /// Failed to load or parse client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Request construction errors --
    /// A request was built with an invalid or missing required parameter.
    /// Raised locally, before any network call is made.
    #[error("missing or invalid parameter: {0}")]
    MissingParameter(String),

    // -- Network errors --
    /// HTTP request failed at the transport level.
    #[error("http error: {0}")]
    Http(String),

    /// HTTP request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// The remote API returned a non-success HTTP status.
    #[error("api returned status {status}: {reason}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        reason: String,
        /// Raw response body text.
        body: String,
    },

    /// The remote API returned a success status but the body was empty,
    /// null, or not decodable as JSON.
    #[error("empty or undecodable response body: {message}")]
    EmptyResponse {
        /// Descriptive message including the offending body text.
        message: String,
        /// Raw response body text.
        body: String,
    },

    // -- Polling errors --
    /// A job-status polling loop exceeded its configured maximum attempts.
    #[error("job {request_id} did not complete after {attempts} poll attempts")]
    PollTimeout {
        /// The request ID being polled.
        request_id: String,
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for PwError {
    fn from(e: serde_json::Error) -> Self {
        PwError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for PwError {
    fn from(e: toml::de::Error) -> Self {
        PwError::Config(e.to_string())
    }
}

impl PwError {
    /// Whether this error represents a transient condition that a retry
    /// could plausibly resolve. Parameter and configuration errors, 4xx
    /// statuses, and malformed success bodies are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            PwError::Timeout(_) => true,
            PwError::Http(_) => true,
            PwError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pw_error_display() {
        let err = PwError::Config("bad value".to_string());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn test_http_status_display() {
        let err = PwError::HttpStatus {
            status: 503,
            reason: "Service Unavailable".to_string(),
            body: String::new(),
        };
        assert_eq!(err.to_string(), "api returned status 503: Service Unavailable");
    }

    #[test]
    fn test_transient_classification() {
        assert!(PwError::Timeout("t".into()).is_transient());
        assert!(PwError::HttpStatus {
            status: 502,
            reason: String::new(),
            body: String::new()
        }
        .is_transient());
        assert!(!PwError::HttpStatus {
            status: 404,
            reason: String::new(),
            body: String::new()
        }
        .is_transient());
        assert!(!PwError::MissingParameter("hwid".into()).is_transient());
        assert!(!PwError::EmptyResponse {
            message: String::new(),
            body: String::new()
        }
        .is_transient());
    }
}
