//! Delegate hooks for customizing client behavior.
//!
//! A [`ClientDelegate`] intercepts the request pipeline at three points:
//! mutating outgoing transport requests (auth headers, tracing ids), deciding
//! the single bounded retry after a failed first attempt, and translating
//! non-2xx responses into domain errors. Every hook has a safe default, so
//! implementations override only what they need.

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::{Client, Error};

/// Hooks customizing request mutation, retry, and error mapping.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use courier::{Client, ClientDelegate, Error};
/// use http::{header::AUTHORIZATION, HeaderValue};
///
/// struct BearerAuth;
///
/// #[async_trait]
/// impl ClientDelegate for BearerAuth {
///     fn will_send_request(&self, _client: &Client, request: &mut reqwest::Request) {
///         request
///             .headers_mut()
///             .insert(AUTHORIZATION, HeaderValue::from_static("Bearer token"));
///     }
///
///     async fn should_retry(&self, _client: &Client, error: &Error) -> bool {
///         error.status().map_or(false, |s| s.as_u16() == 401)
///     }
/// }
/// ```
#[async_trait]
pub trait ClientDelegate: Send + Sync {
    /// Mutates the transport request just before dispatch.
    ///
    /// Invoked exactly once per physical attempt, so twice when a retry
    /// occurs. The default does nothing.
    fn will_send_request(&self, _client: &Client, _request: &mut reqwest::Request) {}

    /// Decides whether a failed first attempt should be retried.
    ///
    /// Invoked exactly once per call, after the first attempt fails with a
    /// transport error or a mapped invalid response. May suspend, e.g. to
    /// refresh credentials. Returning `true` triggers exactly one more
    /// attempt; a second failure is terminal. The default returns `false`.
    async fn should_retry(&self, _client: &Client, _error: &Error) -> bool {
        false
    }

    /// Translates a response with a status outside `[200, 300)` into an
    /// error.
    ///
    /// The default produces [`Error::UnacceptableStatusCode`] carrying the
    /// status, headers, and body. Override to map API error payloads into
    /// domain errors via [`Error::api`].
    fn map_invalid_response(
        &self,
        _client: &Client,
        status: StatusCode,
        headers: &HeaderMap,
        data: &[u8],
    ) -> Error {
        Error::UnacceptableStatusCode {
            status,
            raw_body: Bytes::copy_from_slice(data),
            headers: headers.clone(),
        }
    }
}

/// The delegate used when none is configured: no request mutation, never
/// retries, generic invalid-response errors.
pub(crate) struct DefaultDelegate;

impl ClientDelegate for DefaultDelegate {}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::builder("api.github.com").build().unwrap()
    }

    #[tokio::test]
    async fn default_delegate_never_retries() {
        let delegate = DefaultDelegate;
        let error = Error::MalformedUrl("x".to_string());
        assert!(!delegate.should_retry(&client(), &error).await);
    }

    #[test]
    fn default_delegate_leaves_request_untouched() {
        let delegate = DefaultDelegate;
        let client = client();
        let mut request = reqwest::Request::new(
            http::Method::GET,
            url::Url::parse("https://api.github.com/user").unwrap(),
        );
        delegate.will_send_request(&client, &mut request);
        assert!(request.headers().is_empty());
    }

    #[test]
    fn default_invalid_response_mapping_carries_context() {
        let delegate = DefaultDelegate;
        let error = delegate.map_invalid_response(
            &client(),
            StatusCode::UNAUTHORIZED,
            &HeaderMap::new(),
            b"denied",
        );
        match error {
            Error::UnacceptableStatusCode {
                status, raw_body, ..
            } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(raw_body.as_ref(), b"denied");
            }
            other => panic!("expected UnacceptableStatusCode, got {other:?}"),
        }
    }
}
