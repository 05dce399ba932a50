use std::time::Duration;
use thiserror::Error;

/// Every failure the client layer can surface to a caller.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request failed [{status}]: {detail}")]
    RequestFailed { status: u16, detail: String },

    #[error("Malformed response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Audio device access denied: {0}")]
    DeviceAccessDenied(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// HTTP status carried by a `RequestFailed`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_display_carries_status() {
        let err = ClientError::RequestFailed { status: 400, detail: r#"{"error":"Index missing"}"#.into() };
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("[400]"));
        assert!(err.to_string().contains("Index missing"));
    }

    #[test]
    fn test_timeout_display() {
        let err = ClientError::Timeout(Duration::from_secs(30));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Request timed out after 30s");
        assert_eq!(err.status(), None);
    }
}
