//! Error types for HTTP API calls.
//!
//! Errors preserve the context needed to debug a failed call — raw response
//! bytes, status codes, and headers — without wrapping that hides the root
//! cause. Whether an error is ever retried is decided by the client's
//! [`ClientDelegate`](crate::ClientDelegate), not by the error itself.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// The main error type for HTTP API calls.
///
/// Build-time errors (`MalformedUrl`, `Encode`, `Configuration`) and `Decode`
/// errors are terminal: the client surfaces them immediately without
/// consulting the delegate. `Transport`, `UnacceptableStatusCode`, and `Api`
/// errors from the first attempt of a call are offered to the delegate's
/// retry hook exactly once.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The path and query could not be combined into a valid URL.
    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    /// The request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A network-level error from the underlying transport (connection
    /// failure, DNS lookup failure, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server returned a status code outside `[200, 300)`.
    ///
    /// This is the default mapping produced by
    /// [`ClientDelegate::map_invalid_response`](crate::ClientDelegate::map_invalid_response);
    /// delegates may replace it with an [`Error::Api`] domain error.
    #[error("unacceptable status code {status}")]
    UnacceptableStatusCode {
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body.
        raw_body: Bytes,
        /// The response headers.
        headers: HeaderMap,
    },

    /// A domain-specific error produced by a delegate's invalid-response
    /// mapping. Use [`Error::downcast_ref`] to recover the concrete type.
    #[error("{0}")]
    Api(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The response body could not be decoded into the expected type.
    ///
    /// Occurs only after a successful 2xx response; never retried.
    #[error("failed to decode response body: {source}")]
    Decode {
        /// The raw response body that failed to decode.
        raw_body: Bytes,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The client could not be constructed from the given configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Wraps a domain error so a delegate can return it from
    /// `map_invalid_response`.
    pub fn api<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Api(Box::new(error))
    }

    /// Returns the concrete domain error if this is an [`Error::Api`] of
    /// type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Error::Api(inner) => inner.downcast_ref(),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::UnacceptableStatusCode { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn raw_body(&self) -> Option<&[u8]> {
        match self {
            Error::UnacceptableStatusCode { raw_body, .. } => Some(raw_body),
            Error::Decode { raw_body, .. } => Some(raw_body),
            _ => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Error::MalformedUrl(error.to_string())
    }
}

/// A specialized `Result` type for HTTP API calls.
pub type Result<T> = std::result::Result<T, Error>;
