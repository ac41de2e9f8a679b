//! Rate-limit snapshot parsed from response headers.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate-limit state reported by the API at the moment of a call.
///
/// Missing or unparsable headers leave the matching field at its zero value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Requests allowed per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// When the window resets.
    pub reset: Option<DateTime<Utc>>,
}

impl Rate {
    /// Parse `X-RateLimit-Limit`, `X-RateLimit-Remaining` and `X-RateLimit-Reset`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        };

        Self {
            limit: header(LIMIT_HEADER).and_then(|v| v.parse().ok()).unwrap_or(0),
            remaining: header(REMAINING_HEADER)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            reset: header(RESET_HEADER)
                .and_then(|v| v.parse::<i64>().ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parses_all_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("X-RateLimit-Limit", HeaderValue::from_static("100"));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
        headers.insert("X-RateLimit-Reset", HeaderValue::from_static("1700000000"));

        let rate = Rate::from_headers(&headers);
        assert_eq!(rate.limit, 100);
        assert_eq!(rate.remaining, 0);
        assert_eq!(
            rate.reset.map(|r| r.to_rfc3339()),
            Some("2023-11-14T22:13:20+00:00".to_string())
        );
    }

    #[test]
    fn test_missing_and_garbage_headers_are_zero() {
        let mut headers = HeaderMap::new();
        headers.insert("X-RateLimit-Limit", HeaderValue::from_static("lots"));

        let rate = Rate::from_headers(&headers);
        assert_eq!(rate, Rate::default());
    }
}
