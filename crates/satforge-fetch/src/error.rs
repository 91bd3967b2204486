//! Fetch error types.

use thiserror::Error;

/// Errors that can occur when talking to the question bank API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The API response could not be turned into a usable question.
    #[error("malformed question `{id}`: {detail}")]
    MalformedResponse { id: String, detail: String },
}

impl FetchError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        match self {
            FetchError::MalformedResponse { .. } => true,
            FetchError::ApiError { status, .. } => (400..500).contains(status) && *status != 429,
            _ => false,
        }
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            FetchError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_permanent_except_rate_limits() {
        let not_found = FetchError::ApiError {
            status: 404,
            message: "no such question".into(),
        };
        assert!(not_found.is_permanent());

        let rate_limited = FetchError::RateLimited {
            retry_after_ms: 5000,
        };
        assert!(!rate_limited.is_permanent());
        assert_eq!(rate_limited.retry_after_ms(), Some(5000));

        let server = FetchError::ApiError {
            status: 503,
            message: "overloaded".into(),
        };
        assert!(!server.is_permanent());
        assert_eq!(server.retry_after_ms(), None);
    }
}
