//! REST API error types

use thiserror::Error;

use crate::session::SessionError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No session token found. Run 'fleetdash login --token <TOKEN>' first")]
    NotAuthenticated,

    #[error("Request to {url} was rejected (status {status}); the session token may be invalid or expired")]
    Unauthorized {
        url: String,
        status: u16,
    },

    #[error("API error (status {status}) from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Whether retrying later could plausibly succeed. Only used for logging.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(e) => e.is_timeout() || e.is_connect(),
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status of the failed response, when there was one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_transient() {
        let err = ApiError::Status {
            url: "http://localhost/api".to_string(),
            status: 503,
            body: String::new(),
        };
        assert!(err.is_transient());
        assert_eq!(err.status_code(), Some(503));
    }

    #[test]
    fn test_client_errors_are_permanent() {
        let err = ApiError::Status {
            url: "http://localhost/api".to_string(),
            status: 400,
            body: "bad vehicle number".to_string(),
        };
        assert!(!err.is_transient());
        assert!(!ApiError::NotAuthenticated.is_transient());
        assert_eq!(ApiError::NotAuthenticated.status_code(), None);
    }
}
