//! JSON serialization for request bodies and response values.

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};

use crate::Error;

/// Encodes request bodies to JSON and decodes response bodies from JSON.
///
/// The serializer is stateless apart from its configuration and is shared
/// read-only across concurrent calls. Date and time values follow the serde
/// implementations of the value types; with `chrono` types that is RFC 3339
/// text in both directions.
///
/// Callers who need different wire behavior can hand a reconfigured
/// serializer to [`ClientBuilder::serializer`](crate::ClientBuilder::serializer).
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    pretty: bool,
}

impl Serializer {
    /// Creates a serializer with compact output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables pretty-printed encoding.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Encodes a value to JSON bytes.
    pub fn encode<T>(&self, value: &T) -> Result<Vec<u8>, Error>
    where
        T: Serialize + ?Sized,
    {
        let result = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        result.map_err(Error::Encode)
    }

    /// Decodes a value from JSON bytes.
    ///
    /// On failure the returned [`Error::Decode`] carries the offending bytes
    /// alongside the underlying serde error.
    pub fn decode<T>(&self, data: &[u8]) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(data).map_err(|source| Error::Decode {
            raw_body: Bytes::copy_from_slice(data),
            source,
        })
    }
}
