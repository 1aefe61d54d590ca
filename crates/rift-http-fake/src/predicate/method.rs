//! HTTP method predicate.

use super::RequestPredicate;
use crate::error::ConfigurationError;
use crate::request::InterceptedRequest;
use async_trait::async_trait;
use hyper::Method;

/// Satisfied when the request method equals the configured method.
///
/// Method names are case-sensitive, as defined by [`hyper::Method`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMethod {
    method: Method,
}

impl HttpMethod {
    /// Match requests using `method`.
    pub fn new(method: Method) -> Self {
        Self { method }
    }

    /// Parse a method name such as `"GET"` or a custom extension method.
    pub fn parse(method: &str) -> Result<Self, ConfigurationError> {
        Method::from_bytes(method.as_bytes())
            .map(Self::new)
            .map_err(|_| ConfigurationError::InvalidMethod(method.to_string()))
    }

    /// The configured method.
    pub fn method(&self) -> &Method {
        &self.method
    }
}

#[async_trait]
impl RequestPredicate for HttpMethod {
    async fn is_satisfied_by(&self, request: &InterceptedRequest) -> bool {
        *request.method() == self.method
    }
}
