//! Mapping of non-2xx responses to typed errors.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::error::{ErrorResponse, FieldError, HarvestError, RateLimitError};
use crate::rate::Rate;

const RATE_LIMIT_MESSAGE: &str = "API rate limit exceeded";

/// Classify a response. Returns `None` for 2xx.
///
/// The body is decoded best-effort: an empty or malformed body never fails the
/// classification, it only leaves the message to be derived from the status.
pub fn classify(
    method: &Method,
    url: &Url,
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> Option<HarvestError> {
    if status.is_success() {
        return None;
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Some(HarvestError::RateLimited(RateLimitError {
            method: method.clone(),
            url: url.clone(),
            status,
            message: RATE_LIMIT_MESSAGE.to_string(),
            rate: Rate::from_headers(headers),
        }));
    }

    let (body_message, errors) = parse_envelope(body);
    let mut response = ErrorResponse {
        method: method.clone(),
        url: url.clone(),
        status,
        message: body_message.unwrap_or_default(),
        errors,
    };

    let err = match status {
        StatusCode::UNAUTHORIZED => {
            response.message =
                "Authentication failed. Check your access token and account ID.".to_string();
            HarvestError::Authentication(response)
        }
        StatusCode::FORBIDDEN => {
            response.message =
                "Access forbidden. You don't have permission to access this resource.".to_string();
            HarvestError::Authorization(response)
        }
        StatusCode::NOT_FOUND => {
            response.message = "Resource not found.".to_string();
            HarvestError::NotFound(response)
        }
        StatusCode::UNPROCESSABLE_ENTITY => {
            if response.message.is_empty() {
                response.message = "Invalid request. Check your input parameters.".to_string();
            }
            HarvestError::Validation(response)
        }
        _ => {
            if response.message.is_empty() {
                response.message = format!("Unexpected status code: {}", status.as_u16());
            }
            HarvestError::UnexpectedStatus(response)
        }
    };

    tracing::debug!(%method, %url, status = status.as_u16(), "request failed");
    Some(err)
}

/// Pull `error` and `error_description` out of an error body.
fn parse_envelope(body: &[u8]) -> (Option<String>, Vec<FieldError>) {
    let Ok(json) = serde_json::from_slice::<Value>(body) else {
        return (None, Vec::new());
    };

    let message = json
        .get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    // Only the array form carries field errors; OAuth-style string
    // descriptions are ignored.
    let errors = json
        .get("error_description")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value::<FieldError>(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    (message, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn url() -> Url {
        Url::parse("https://api.harvestapp.com/v2/clients/7").unwrap()
    }

    fn run(status: u16, headers: &HeaderMap, body: &str) -> Option<HarvestError> {
        classify(
            &Method::GET,
            &url(),
            StatusCode::from_u16(status).unwrap(),
            headers,
            body.as_bytes(),
        )
    }

    #[test]
    fn test_success_is_not_an_error() {
        assert!(run(200, &HeaderMap::new(), "").is_none());
        assert!(run(204, &HeaderMap::new(), "").is_none());
    }

    #[test]
    fn test_rate_limit_uses_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("X-RateLimit-Limit", HeaderValue::from_static("100"));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
        headers.insert("X-RateLimit-Reset", HeaderValue::from_static("1700000000"));

        match run(429, &headers, "") {
            Some(HarvestError::RateLimited(e)) => {
                assert_eq!(e.rate.limit, 100);
                assert_eq!(e.rate.remaining, 0);
                assert_eq!(
                    e.rate.reset.map(|r| r.timestamp()),
                    Some(1_700_000_000)
                );
                assert_eq!(e.message, "API rate limit exceeded");
                assert!(e.to_string().contains("resets at 22:13:20"));
            }
            other => panic!("expected rate limit error, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found_overrides_body_message() {
        match run(404, &HeaderMap::new(), r#"{"error":"not found"}"#) {
            Some(HarvestError::NotFound(e)) => {
                assert_eq!(e.message, "Resource not found.");
                assert!(e
                    .to_string()
                    .starts_with("GET https://api.harvestapp.com/v2/clients/7: 404"));
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_keeps_body_message_and_fields() {
        let body = r#"{"error":"invalid","error_description":[{"field":"name","message":"required"}]}"#;
        match run(422, &HeaderMap::new(), body) {
            Some(HarvestError::Validation(e)) => {
                assert_eq!(e.message, "invalid");
                assert!(e.to_string().contains("name: required"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_without_body_gets_default_message() {
        match run(422, &HeaderMap::new(), "") {
            Some(HarvestError::Validation(e)) => {
                assert_eq!(e.message, "Invalid request. Check your input parameters.");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_auth_statuses() {
        assert!(matches!(
            run(401, &HeaderMap::new(), r#"{"error":"invalid_token"}"#),
            Some(HarvestError::Authentication(_))
        ));
        assert!(matches!(
            run(403, &HeaderMap::new(), "<html>nope</html>"),
            Some(HarvestError::Authorization(_))
        ));
    }

    #[test]
    fn test_unexpected_status_tolerates_garbage_body() {
        match run(503, &HeaderMap::new(), "<html>down</html>") {
            Some(HarvestError::UnexpectedStatus(e)) => {
                assert_eq!(e.message, "Unexpected status code: 503");
                assert!(e.errors.is_empty());
            }
            other => panic!("expected unexpected status, got {other:?}"),
        }
    }

    #[test]
    fn test_string_error_description_is_ignored() {
        let body = r#"{"error":"invalid_grant","error_description":"token expired"}"#;
        match run(400, &HeaderMap::new(), body) {
            Some(HarvestError::UnexpectedStatus(e)) => {
                assert_eq!(e.message, "invalid_grant");
                assert!(e.errors.is_empty());
            }
            other => panic!("expected unexpected status, got {other:?}"),
        }
    }
}
