//! HTTP error mapping shared by the provider clients.

use crate::error::ProviderError;
use reqwest::{StatusCode, header::HeaderValue};
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps a non-success provider response into a [`ProviderError`].
///
/// Rate limits and upstream 5xx responses are classified retryable.
pub(crate) fn map_http_error(
    status: StatusCode,
    body: String,
    retry_after: Option<Duration>,
) -> ProviderError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    ProviderError::Http {
        status: status.as_u16(),
        message,
        is_retryable,
        retry_after,
    }
}

/// Maps a transport-level failure (no HTTP response at all).
pub(crate) fn map_request_error(context: &str, err: reqwest::Error) -> ProviderError {
    ProviderError::Request {
        message: format!("{context}: {err}"),
        is_retryable: err.is_connect() || err.is_timeout(),
    }
}

/// Parses a `Retry-After` header given in seconds.
pub(crate) fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // Retry-After HTTP-date parsing is omitted; providers send seconds.
    value.parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_error_body_is_unwrapped() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"slow down"}}"#.to_string(),
            Some(Duration::from_secs(3)),
        );
        match err {
            ProviderError::Http {
                status,
                message,
                is_retryable,
                retry_after,
            } => {
                assert_eq!(status, 429);
                assert_eq!(message, "slow down");
                assert!(is_retryable);
                assert_eq!(retry_after, Some(Duration::from_secs(3)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = map_http_error(StatusCode::BAD_REQUEST, "nope".to_string(), None);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        let header = HeaderValue::from_static("12");
        assert_eq!(
            parse_retry_after(Some(&header)),
            Some(Duration::from_secs(12))
        );
        assert_eq!(parse_retry_after(None), None);
    }
}
