//! Buffered view of an outgoing request.
//!
//! The body is collected once by the layer; predicates read the buffered bytes so the
//! same body can still be forwarded downstream when no rule matches.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use hyper::header::{HeaderName, HeaderValue};
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;
use std::fmt;

/// An outgoing request as seen by predicates and recorded in the observed log.
///
/// ```
/// use hyper::header::{HeaderValue, ACCEPT};
/// use hyper::{Method, Uri};
/// use rift_http_fake::InterceptedRequest;
///
/// let request = InterceptedRequest::new(Method::PUT, Uri::from_static("https://pablocompany.com/items/7?force=true"))
///     .with_header(ACCEPT, HeaderValue::from_static("application/json"))
///     .with_body(r#"{"name":"seven"}"#);
///
/// assert_eq!(request.method(), Method::PUT);
/// assert_eq!(request.uri().host(), Some("pablocompany.com"));
/// assert_eq!(request.path(), "/items/7");
/// assert_eq!(request.query(), Some("force=true"));
/// assert_eq!(request.headers()[ACCEPT], "application/json");
/// assert_eq!(request.body().as_ref(), br#"{"name":"seven"}"#);
/// assert_eq!(request.to_string(), "PUT https://pablocompany.com/items/7?force=true");
/// ```
#[derive(Debug, Clone)]
pub struct InterceptedRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    received_at: DateTime<Utc>,
}

impl InterceptedRequest {
    /// Create a request with no headers and an empty body.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            received_at: Utc::now(),
        }
    }

    /// Build from the head of a `hyper` request and its already collected body.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            body,
            received_at: Utc::now(),
        }
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Append a header, keeping any earlier values for the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// HTTP method of the request.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request URI as sent, including scheme and authority when present.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Absolute path of the request URI, without the query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Raw query string, still percent-encoded; `None` when the URI has none.
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Request headers; repeated names keep every value.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Buffered body bytes, empty when the request had no body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text, `None` when empty or not valid UTF-8.
    pub fn body_text(&self) -> Option<&str> {
        if self.body.is_empty() {
            return None;
        }
        std::str::from_utf8(&self.body).ok()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// When the request was captured.
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

impl fmt::Display for InterceptedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Request;
    use serde::Deserialize;

    #[test]
    fn test_from_parts_keeps_head_and_body() {
        let request = Request::post("https://pablocompany.com/api/orders?page=2")
            .header("content-type", "application/json")
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();

        let intercepted =
            InterceptedRequest::from_parts(&parts, Bytes::from_static(br#"{"id":7}"#));

        assert_eq!(intercepted.method(), &Method::POST);
        assert_eq!(intercepted.path(), "/api/orders");
        assert_eq!(intercepted.query(), Some("page=2"));
        assert_eq!(
            intercepted.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(intercepted.body_text(), Some(r#"{"id":7}"#));
        // Parts are borrowed, so the original head is still usable for forwarding
        assert_eq!(parts.uri.path(), "/api/orders");
    }

    #[test]
    fn test_json_body() {
        #[derive(Deserialize)]
        struct Order {
            id: u32,
        }

        let request = InterceptedRequest::new(Method::POST, Uri::from_static("/orders"))
            .with_body(r#"{"id": 42}"#);
        let order: Order = request.json().unwrap();
        assert_eq!(order.id, 42);
    }

    #[test]
    fn test_empty_body_has_no_text() {
        let request = InterceptedRequest::new(Method::GET, Uri::from_static("/"));
        assert_eq!(request.body_text(), None);
        assert_eq!(request.to_string(), "GET /");
    }
}
