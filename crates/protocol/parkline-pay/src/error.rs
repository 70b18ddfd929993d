//! Error types for the payment module.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for payment operations.
pub type PayResult<T> = Result<T, PayError>;

/// Errors that can occur talking to a payment provider.
#[derive(Debug, Error)]
pub enum PayError {
    /// Session unknown to the provider.
    #[error("checkout session not found: {0}")]
    SessionNotFound(String),

    /// Provider rejected the request.
    #[error("provider returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider error message
        message: String,
    },

    /// Provider is throttling this account (HTTP 429).
    #[error("provider rate limited the request: {message}")]
    RateLimited {
        /// Provider error message
        message: String,
        /// Wait requested through `Retry-After`, if any
        retry_after: Option<Duration>,
    },

    /// Provider failed or hit a lock conflict and asked to be retried.
    #[error("provider unavailable ({status}): {message}")]
    Unavailable {
        /// HTTP status code
        status: u16,
        /// Provider error message
        message: String,
    },

    /// Network error (retryable).
    #[error("network error: {0}")]
    Network(String),

    /// Timeout error (retryable).
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Provider response could not be interpreted.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error (lock poisoning, unexpected state).
    #[error("internal error: {0}")]
    Internal(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PayError {
    /// Create a new SessionNotFound error.
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Self::SessionNotFound(session_id.into())
    }

    /// Create a new Api error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new Network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new Timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a new InvalidResponse error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a new Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited { .. } | Self::Unavailable { .. }
        )
    }

    /// Wait the provider asked for before the next attempt.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Classify an HTTP error status from the provider.
    ///
    /// 409 is Stripe's lock-timeout and idempotency conflict status and is
    /// safe to repeat for reads, as are 429 and 5xx.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 => Self::RateLimited {
                message,
                retry_after: None,
            },
            409 | 500..=599 => Self::Unavailable { status, message },
            _ => Self::api(status, message),
        }
    }

    /// Classify a failed response using Stripe's retry headers.
    ///
    /// `Stripe-Should-Retry`, when present, overrides the status-based
    /// classification. `Retry-After` is kept on rate-limit errors.
    pub fn from_response(
        status: u16,
        message: impl Into<String>,
        should_retry: Option<bool>,
        retry_after: Option<Duration>,
    ) -> Self {
        let message = message.into();
        match (Self::from_status(status, message.clone()), should_retry) {
            (Self::RateLimited { message, .. }, Some(true) | None) => Self::RateLimited {
                message,
                retry_after,
            },
            (err, None) => err,
            (err, Some(true)) if err.is_retryable() => err,
            (_, Some(true)) => Self::Unavailable { status, message },
            (_, Some(false)) => Self::api(status, message),
        }
    }
}

impl From<reqwest::Error> for PayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for PayError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(PayError::network("connection refused").is_retryable());
        assert!(PayError::timeout("read timed out").is_retryable());
        assert!(!PayError::api(400, "bad request").is_retryable());
        assert!(!PayError::session_not_found("cs_1").is_retryable());
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            PayError::from_status(429, "slow down"),
            PayError::RateLimited { .. }
        ));
        assert!(matches!(
            PayError::from_status(409, "lock_timeout"),
            PayError::Unavailable { status: 409, .. }
        ));
        assert!(PayError::from_status(503, "unavailable").is_retryable());
        assert!(matches!(
            PayError::from_status(401, "bad key"),
            PayError::Api { status: 401, .. }
        ));
    }

    #[test]
    fn test_from_response_headers() {
        let limited = PayError::from_response(429, "slow down", None, Some(Duration::from_secs(3)));
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(3)));

        // Provider says the request can never succeed as sent
        let refused = PayError::from_response(409, "idempotency key reused", Some(false), None);
        assert!(matches!(refused, PayError::Api { status: 409, .. }));

        let overridden = PayError::from_response(400, "try again", Some(true), None);
        assert!(matches!(overridden, PayError::Unavailable { status: 400, .. }));

        assert_eq!(PayError::network("reset").retry_after(), None);
    }

    #[test]
    fn test_error_display() {
        let err = PayError::api(402, "card declined");
        assert_eq!(err.to_string(), "provider returned 402: card declined");
    }
}
