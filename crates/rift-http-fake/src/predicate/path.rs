//! Absolute path predicate.

use super::folded::FoldedText;
use super::RequestPredicate;
use crate::error::ConfigurationError;
use crate::request::InterceptedRequest;
use async_trait::async_trait;

/// Satisfied when the request path equals the configured path, ignoring case.
///
/// The comparison is exact: `/a` does not match `/a/b`, and the query string is
/// never part of the comparison.
#[derive(Debug, Clone)]
pub struct AbsolutePath {
    path: FoldedText,
}

impl AbsolutePath {
    /// Fails with [`ConfigurationError::EmptyAbsolutePath`] for an empty path.
    pub fn new(path: impl Into<String>) -> Result<Self, ConfigurationError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ConfigurationError::EmptyAbsolutePath);
        }
        Ok(Self {
            path: FoldedText::new(path),
        })
    }

    /// The path as configured, before case folding.
    pub fn path(&self) -> &str {
        &self.path.original
    }
}

#[async_trait]
impl RequestPredicate for AbsolutePath {
    async fn is_satisfied_by(&self, request: &InterceptedRequest) -> bool {
        let path = request.path();
        !path.is_empty() && self.path.eq_ignoring_case(path)
    }
}
