//! Response envelope pairing a value with its transport provenance.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// A wrapper around a successful HTTP response.
///
/// The envelope pairs the decoded value with the raw response bytes, the
/// exact transport request that was sent (after any delegate mutation), and
/// the response status and headers. Typed envelopes are produced by mapping
/// the raw-bytes envelope through a decode step, so `data`, `request`,
/// `status`, and `headers` are identical between the two forms.
#[derive(Debug)]
pub struct Response<T> {
    /// The decoded response value (raw bytes for `data(..)` calls, `()` for
    /// void calls).
    pub value: T,

    /// The raw response body. Always populated, regardless of `T`.
    pub data: Bytes,

    /// The transport request that produced this response, as it went on the
    /// wire after [`ClientDelegate::will_send_request`](crate::ClientDelegate::will_send_request).
    pub request: reqwest::Request,

    /// The HTTP status code.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,
}

impl<T> Response<T> {
    /// Transforms the value while preserving the response metadata.
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            value: f(self.value),
            data: self.data,
            request: self.request,
            status: self.status,
            headers: self.headers,
        }
    }

    /// Returns a response header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
