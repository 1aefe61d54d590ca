//! Header value predicate.

use super::RequestPredicate;
use crate::error::ConfigurationError;
use crate::request::InterceptedRequest;
use async_trait::async_trait;
use hyper::header::{HeaderName, HeaderValue};

/// Satisfied when any value of the named header equals the configured value.
///
/// Header names are case-insensitive; values are compared exactly.
#[derive(Debug, Clone)]
pub struct HeaderEquals {
    name: HeaderName,
    value: HeaderValue,
}

impl HeaderEquals {
    /// Fails with [`ConfigurationError::InvalidHeader`] when `name` or `value` is not a
    /// valid header name or value.
    pub fn new(name: &str, value: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidHeader {
            name: name.to_string(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            name: header_name,
            value: header_value,
        })
    }
}

#[async_trait]
impl RequestPredicate for HeaderEquals {
    async fn is_satisfied_by(&self, request: &InterceptedRequest) -> bool {
        request
            .headers()
            .get_all(&self.name)
            .iter()
            .any(|actual| *actual == self.value)
    }
}
