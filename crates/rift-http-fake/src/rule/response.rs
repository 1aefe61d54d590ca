//! Configured responses returned in place of a real network call.

use crate::error::ConfigurationError;
use crate::layer::InterceptBody;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{HeaderMap, Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use std::str::FromStr;
use tracing::warn;

/// Status, headers and body of a response attached to a rule.
///
/// The value is shared read-only between every request the rule matches; each match
/// gets a fresh `hyper::Response` built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Default for ConfiguredResponse {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

impl ConfiguredResponse {
    /// Response with `status`, no headers and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header. Invalid names or values are skipped with a warning.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::from_str(name), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!(header = name, "Skipping invalid configured response header"),
        }
        self
    }

    /// Add several headers, skipping invalid names or values with a warning.
    pub fn with_headers<H, K, V>(mut self, headers: H) -> Self
    where
        H: IntoIterator<Item = (K, V)>,
        HeaderName: TryFrom<K>,
        HeaderValue: TryFrom<V>,
    {
        for (key, value) in headers {
            match (HeaderName::try_from(key), HeaderValue::try_from(value)) {
                (Ok(name), Ok(value)) => {
                    self.headers.insert(name, value);
                }
                _ => warn!("Skipping invalid configured response header"),
            }
        }
        self
    }

    /// Serialize `value` as the JSON body and set `content-type: application/json`.
    pub fn with_json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, ConfigurationError> {
        self.body = Bytes::from(serde_json::to_vec(value)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Status code of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Headers of the response.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body of the response.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Build a fresh `hyper` response carrying this status, headers and body.
    pub fn to_response(&self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body.clone()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }

    /// Same as [`ConfiguredResponse::to_response`] with the body boxed for the layer.
    pub fn to_boxed_response(&self) -> Response<InterceptBody> {
        self.to_response()
            .map(|body| body.map_err(|never: Infallible| match never {}).boxed_unsync())
    }
}
