//! Request envelope describing one logical API call.

use http::Method;
use serde::Serialize;
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{Error, Serializer};

/// An immutable description of one logical API call.
///
/// The type parameter `T` is the expected decoded response type; it is only a
/// marker and does not constrain construction. Bodies can only be attached
/// through the constructors for body-accepting methods ([`Request::post`],
/// [`Request::put`], [`Request::patch`]).
///
/// # Examples
///
/// ```
/// use courier::Request;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User { login: String }
///
/// let request: Request<User> = Request::get("/user");
/// let search: Request<Vec<User>> = Request::get("/search/users")
///     .query([("q", Some("rust")), ("page", None)]);
/// ```
#[derive(Debug)]
pub struct Request<T> {
    /// A generated unique id for this request. Informational only; the client
    /// does not use it for deduplication or caching.
    pub id: Uuid,
    /// The HTTP method.
    pub method: Method,
    /// The request path: either absolute (`/user`), resolved against the
    /// client configuration, or a fully-qualified URL used verbatim.
    pub path: String,
    /// Query parameters in insertion order. Entries with a `None` value are
    /// omitted from the built URL.
    pub query: Vec<(String, Option<String>)>,
    pub(crate) body: Option<Body>,
    response_type: PhantomData<fn() -> T>,
}

impl<T> Request<T> {
    fn new(method: Method, path: impl Into<String>, body: Option<Body>) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            path: path.into(),
            query: Vec::new(),
            body,
            response_type: PhantomData,
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    /// Creates a POST request with a JSON body.
    pub fn post<B>(path: impl Into<String>, body: B) -> Self
    where
        B: Serialize + Send + Sync + 'static,
    {
        Self::new(Method::POST, path, Some(Body::new(body)))
    }

    /// Creates a PUT request with a JSON body.
    pub fn put<B>(path: impl Into<String>, body: B) -> Self
    where
        B: Serialize + Send + Sync + 'static,
    {
        Self::new(Method::PUT, path, Some(Body::new(body)))
    }

    /// Creates a PATCH request with a JSON body.
    pub fn patch<B>(path: impl Into<String>, body: B) -> Self
    where
        B: Serialize + Send + Sync + 'static,
    {
        Self::new(Method::PATCH, path, Some(Body::new(body)))
    }

    /// Creates a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, None)
    }

    /// Creates an OPTIONS request.
    pub fn options(path: impl Into<String>) -> Self {
        Self::new(Method::OPTIONS, path, None)
    }

    /// Creates a HEAD request.
    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::HEAD, path, None)
    }

    /// Creates a TRACE request.
    pub fn trace(path: impl Into<String>) -> Self {
        Self::new(Method::TRACE, path, None)
    }

    /// Appends query parameters.
    ///
    /// Values are stringified via their `ToString` implementation. `None`
    /// values are kept in the envelope but dropped when the URL is built.
    pub fn query<K, V>(mut self, entries: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.query.extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.map(|v| v.to_string()))),
        );
        self
    }
}

/// A type-erased request body: a boxed closure capturing the concrete value
/// together with its encode call, so `Request<T>` stays non-generic over the
/// body type.
pub(crate) struct Body(Box<dyn Fn(&Serializer) -> Result<Vec<u8>, Error> + Send + Sync>);

impl Body {
    fn new<B>(value: B) -> Self
    where
        B: Serialize + Send + Sync + 'static,
    {
        Body(Box::new(move |serializer| serializer.encode(&value)))
    }

    pub(crate) fn encode(&self, serializer: &Serializer) -> Result<Vec<u8>, Error> {
        (self.0)(serializer)
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Body(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_method_and_body_presence() {
        let get: Request<()> = Request::get("/user");
        assert_eq!(get.method, Method::GET);
        assert!(get.body.is_none());

        let post: Request<()> = Request::post("/user", serde_json::json!({"login": "kean"}));
        assert_eq!(post.method, Method::POST);
        assert!(post.body.is_some());

        let head: Request<()> = Request::head("/user");
        assert_eq!(head.method, Method::HEAD);
        assert!(head.body.is_none());
    }

    #[test]
    fn ids_are_unique_per_request() {
        let a: Request<()> = Request::get("/user");
        let b: Request<()> = Request::get("/user");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn query_stringifies_values_in_insertion_order() {
        let request: Request<()> = Request::get("/search")
            .query([("page", Some(2)), ("limit", Some(50))])
            .query([("verbose", None::<bool>)]);

        assert_eq!(
            request.query,
            vec![
                ("page".to_string(), Some("2".to_string())),
                ("limit".to_string(), Some("50".to_string())),
                ("verbose".to_string(), None),
            ]
        );
    }

    #[test]
    fn body_encodes_through_serializer() {
        let request: Request<()> = Request::post("/user", serde_json::json!({"login": "kean"}));
        let bytes = request.body.unwrap().encode(&Serializer::new()).unwrap();
        assert_eq!(bytes, br#"{"login":"kean"}"#);
    }
}
