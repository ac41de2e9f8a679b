//! Error types for Harvest API operations.

use std::fmt;

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::rate::Rate;

/// Errors that can occur during Harvest API operations.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Configuration is missing or incomplete.
    #[error("Harvest configuration required: {0}")]
    ConfigMissing(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Request parameters could not be encoded.
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// A successful response did not match the expected shape.
    #[error("Failed to parse response from {method} {url}: {source}")]
    Decode {
        method: Method,
        url: Url,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 429.
    #[error("{0}")]
    RateLimited(RateLimitError),

    /// HTTP 401.
    #[error("{0}")]
    Authentication(ErrorResponse),

    /// HTTP 403.
    #[error("{0}")]
    Authorization(ErrorResponse),

    /// HTTP 404.
    #[error("{0}")]
    NotFound(ErrorResponse),

    /// HTTP 422.
    #[error("{0}")]
    Validation(ErrorResponse),

    /// Any other non-2xx status.
    #[error("{0}")]
    UnexpectedStatus(ErrorResponse),

    /// The request context was cancelled.
    #[error("request cancelled")]
    Cancelled,

    /// The request context deadline passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl HarvestError {
    /// HTTP status code for errors that came from an API response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RateLimited(e) => Some(e.status),
            Self::Authentication(e)
            | Self::Authorization(e)
            | Self::NotFound(e)
            | Self::Validation(e)
            | Self::UnexpectedStatus(e) => Some(e.status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// The parsed error body, for errors that carry one.
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Authentication(e)
            | Self::Authorization(e)
            | Self::NotFound(e)
            | Self::Validation(e)
            | Self::UnexpectedStatus(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true for [`Cancelled`](Self::Cancelled) and
    /// [`DeadlineExceeded`](Self::DeadlineExceeded).
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// A field-level validation message from an error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// A non-2xx response from the Harvest API.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub method: Method,
    pub url: Url,
    pub status: StatusCode,
    /// Human-readable message, from the body or derived from the status.
    pub message: String,
    /// Field-level errors from `error_description`.
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} {}",
            self.method,
            self.url,
            self.status.as_u16(),
            self.message
        )?;
        for err in &self.errors {
            write!(f, "\n  {}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

/// The API rejected a request because the rate limit was exceeded.
///
/// No retry is attempted; use [`rate`](Self::rate) to decide when to try again.
#[derive(Debug, Clone)]
pub struct RateLimitError {
    pub method: Method,
    pub url: Url,
    pub status: StatusCode,
    pub message: String,
    pub rate: Rate,
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reset = self
            .rate
            .reset
            .map(|r| r.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        write!(
            f,
            "{} {}: {} {} (rate limit: {}/{}, resets at {})",
            self.method,
            self.url,
            self.status.as_u16(),
            self.message,
            self.rate.remaining,
            self.rate.limit,
            reset
        )
    }
}

/// Result type alias for Harvest operations.
pub type Result<T> = core::result::Result<T, HarvestError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, message: &str, errors: Vec<FieldError>) -> ErrorResponse {
        ErrorResponse {
            method: Method::GET,
            url: Url::parse("https://api.harvestapp.com/v2/projects/1").unwrap(),
            status: StatusCode::from_u16(status).unwrap(),
            message: message.to_string(),
            errors,
        }
    }

    #[test]
    fn test_error_response_display_includes_request() {
        let err = response(404, "Resource not found.", vec![]);
        assert_eq!(
            err.to_string(),
            "GET https://api.harvestapp.com/v2/projects/1: 404 Resource not found."
        );
    }

    #[test]
    fn test_error_response_display_lists_fields() {
        let err = response(
            422,
            "invalid",
            vec![
                FieldError {
                    field: "name".to_string(),
                    message: "required".to_string(),
                },
                FieldError {
                    field: "client_id".to_string(),
                    message: "is not a number".to_string(),
                },
            ],
        );
        let rendered = err.to_string();
        assert!(rendered.ends_with("422 invalid\n  name: required\n  client_id: is not a number"));
    }

    #[test]
    fn test_status_accessor() {
        let err = HarvestError::NotFound(response(404, "Resource not found.", vec![]));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.response().is_some());
        assert!(HarvestError::Cancelled.status().is_none());
        assert!(HarvestError::DeadlineExceeded.is_cancellation());
    }
}
