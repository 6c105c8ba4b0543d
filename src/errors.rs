use thiserror::Error;

/// Failure modes of a single source fetch.
///
/// The classifier never sees these; a source that ultimately fails just
/// contributes zero entries to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request exceeded the per-fetch timeout
    #[error("request timed out")]
    Timeout,

    /// Server answered with a non-2xx status
    #[error("server returned HTTP {0}")]
    Status(u16),

    /// Connection-level failure (DNS, TCP, TLS, reset)
    #[error("network error: {0}")]
    Network(String),

    /// 2xx response with nothing usable in the body
    #[error("empty response body")]
    EmptyBody,
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    /// HTTP status errors are final; timeouts and transport errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Timeout | FetchError::Network(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability() {
        assert!(FetchError::Timeout.is_retryable());
        assert!(FetchError::Network("connection reset".to_string()).is_retryable());
        assert!(!FetchError::Status(404).is_retryable());
        assert!(!FetchError::EmptyBody.is_retryable());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(FetchError::Status(502).to_string(), "server returned HTTP 502");
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
    }
}
