//! HTTP client orchestrating URL building, dispatch, validation, and decode.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure and create clients.

use bytes::Bytes;
use http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    delegate::{ClientDelegate, DefaultDelegate},
    endpoint, Error, Request, Response, Result, Serializer,
};

/// Configuration for a [`Client`]. Immutable once the client is built.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host used to resolve requests with absolute paths.
    pub host: String,
    /// Optional path prefix prepended to every request path.
    pub base_path: Option<String>,
    /// Optional port applied to resolved URLs.
    pub port: Option<u16>,
    /// If `true`, resolved URLs use `http` instead of `https`.
    pub insecure: bool,
    /// Optional timeout applied to the underlying transport.
    pub timeout: Option<Duration>,
}

/// An HTTP API client.
///
/// The client holds no per-call mutable state: configuration, serializer, and
/// delegate are read-only after construction, so a single instance (or clones
/// of it, which share the same internals) can serve many concurrent calls
/// without synchronization.
///
/// # Examples
///
/// ```no_run
/// use courier::{Client, Request};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User {
///     login: String,
/// }
///
/// # async fn example() -> Result<(), courier::Error> {
/// let client = Client::builder("api.github.com").build()?;
///
/// let user: User = client.value(Request::get("/user")).await?;
/// println!("logged in as {}", user.login);
///
/// let response = client.send::<User>(Request::get("/users/kean")).await?;
/// println!("{} ({} bytes)", response.value.login, response.data.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: Config,
    serializer: Serializer,
    delegate: Arc<dyn ClientDelegate>,
}

impl Client {
    /// Creates a [`ClientBuilder`] for the given host.
    pub fn builder(host: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(host)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Returns the decoded response value for the given request.
    pub async fn value<T>(&self, request: Request<T>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        Ok(self.send(request).await?.value)
    }

    /// Sends the given request and returns the decoded response envelope.
    pub async fn send<T>(&self, request: Request<T>) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let raw = self.data(request).await?;
        let value = self.inner.serializer.decode(&raw.data)?;
        Ok(raw.map(|_| value))
    }

    /// Sends the given request without decoding the response body.
    ///
    /// Succeeds on any 2xx response irrespective of body content.
    pub async fn send_void(&self, request: Request<()>) -> Result<Response<()>> {
        Ok(self.data(request).await?.map(|_| ()))
    }

    /// Returns the raw response bytes for the given request.
    pub async fn data<T>(&self, request: Request<T>) -> Result<Response<Bytes>> {
        let transport_request = self.make_transport_request(&request)?;
        self.dispatch(transport_request).await
    }

    /// Builds the transport-level request: URL, default headers, encoded
    /// body. Failures here are terminal; the retry hook is never consulted.
    fn make_transport_request<T>(&self, request: &Request<T>) -> Result<reqwest::Request> {
        let url = endpoint::build_url(&self.inner.config, &request.path, &request.query)?;
        let mut out = reqwest::Request::new(request.method.clone(), url);
        out.headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(body) = &request.body {
            let encoded = body.encode(&self.inner.serializer)?;
            out.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *out.body_mut() = Some(encoded.into());
        }

        Ok(out)
    }

    /// Runs the first attempt and, if it fails and the delegate agrees,
    /// exactly one more. The second attempt's outcome is terminal either way.
    async fn dispatch(&self, request: reqwest::Request) -> Result<Response<Bytes>> {
        let second = request.try_clone();

        match self.attempt(request).await {
            Ok(response) => Ok(response),
            Err(error) => {
                let Some(second) = second else {
                    return Err(error);
                };

                if !self.inner.delegate.should_retry(self, &error).await {
                    return Err(error);
                }

                tracing::debug!(error = %error, "retrying request after delegate approval");
                self.attempt(second).await
            }
        }
    }

    /// One physical transport attempt: delegate mutation, dispatch,
    /// validation.
    async fn attempt(&self, mut request: reqwest::Request) -> Result<Response<Bytes>> {
        self.inner.delegate.will_send_request(self, &mut request);

        // Snapshot the request as mutated, for the response envelope. Bodies
        // built by make_transport_request are buffered, so try_clone only
        // fails for caller-injected streaming bodies.
        let sent = request
            .try_clone()
            .unwrap_or_else(|| clone_without_body(&request));

        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self.inner.http.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let data = response.bytes().await?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                url = %sent.url(),
                "received non-success status"
            );
            return Err(self
                .inner
                .delegate
                .map_invalid_response(self, status, &headers, &data));
        }

        Ok(Response {
            value: data.clone(),
            data,
            request: sent,
            status,
            headers,
        })
    }
}

fn clone_without_body(request: &reqwest::Request) -> reqwest::Request {
    let mut copy = reqwest::Request::new(request.method().clone(), request.url().clone());
    *copy.headers_mut() = request.headers().clone();
    copy
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use courier::Client;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), courier::Error> {
/// let client = Client::builder("api.github.com")
///     .base_path("/v3")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    config: Config,
    serializer: Serializer,
    delegate: Option<Arc<dyn ClientDelegate>>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Creates a builder for the given host with default settings.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            config: Config {
                host: host.into(),
                base_path: None,
                port: None,
                insecure: false,
                timeout: None,
            },
            serializer: Serializer::new(),
            delegate: None,
            http_client: None,
        }
    }

    /// Sets a path prefix prepended to every request path.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.config.base_path = Some(base_path.into());
        self
    }

    /// Sets the port for resolved URLs.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    /// Uses `http` instead of `https` for resolved URLs.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.config.insecure = insecure;
        self
    }

    /// Sets the transport timeout applied to every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Replaces the default JSON serializer.
    pub fn serializer(mut self, serializer: Serializer) -> Self {
        self.serializer = serializer;
        self
    }

    /// Sets the delegate customizing request mutation, retry, and error
    /// mapping.
    pub fn delegate(mut self, delegate: impl ClientDelegate + 'static) -> Self {
        self.delegate = Some(Arc::new(delegate));
        self
    }

    /// Supplies a preconfigured transport, overriding [`Self::timeout`].
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the underlying transport cannot
    /// be constructed.
    pub fn build(self) -> Result<Client> {
        let http = match self.http_client {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.config.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|e| {
                    Error::Configuration(format!("failed to build HTTP transport: {e}"))
                })?
            }
        };

        let delegate = self
            .delegate
            .unwrap_or_else(|| Arc::new(DefaultDelegate));

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                config: self.config,
                serializer: self.serializer,
                delegate,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn client() -> Client {
        Client::builder("api.github.com").build().unwrap()
    }

    #[test]
    fn transport_request_carries_accept_header() {
        let request: Request<()> = Request::get("/user");
        let transport = client().make_transport_request(&request).unwrap();

        assert_eq!(transport.method(), Method::GET);
        assert_eq!(transport.url().as_str(), "https://api.github.com/user");
        assert_eq!(
            transport.headers().get(ACCEPT).unwrap(),
            "application/json"
        );
        assert!(transport.headers().get(CONTENT_TYPE).is_none());
        assert!(transport.body().is_none());
    }

    #[test]
    fn transport_request_with_body_sets_content_type() {
        let request: Request<()> = Request::post("/user", serde_json::json!({"login": "kean"}));
        let transport = client().make_transport_request(&request).unwrap();

        assert_eq!(
            transport.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert!(transport.body().is_some());
        // A buffered body keeps the request clonable for the retry path.
        assert!(transport.try_clone().is_some());
    }

    #[test]
    fn malformed_path_fails_at_build_time() {
        let request: Request<()> = Request::get("not a url");
        let err = client().make_transport_request(&request).unwrap_err();
        assert!(matches!(err, Error::MalformedUrl(_)));
    }

    #[test]
    fn builder_configuration_is_reflected() {
        let client = Client::builder("localhost")
            .base_path("/api")
            .port(8080)
            .insecure(true)
            .build()
            .unwrap();

        let request: Request<()> = Request::get("/status");
        let transport = client.make_transport_request(&request).unwrap();
        assert_eq!(transport.url().as_str(), "http://localhost:8080/api/status");
    }
}
