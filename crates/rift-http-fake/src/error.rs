//! Error types for rule configuration, registration, interception and assertions.

use crate::interceptor::RuleId;
use hyper::{Method, Uri};

/// Invalid rule or predicate configuration, reported when the rule is built.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("No request specifications configured. Cannot create a configured HTTP response without any specification")]
    NoPredicates,
    #[error("Invalid empty specifications list for AtLeastOne constraint")]
    EmptyAtLeastOne,
    #[error("Invalid empty specifications list for AllOf constraint")]
    EmptyAllOf,
    #[error("Query parameters cannot be empty")]
    EmptyQueryParams,
    #[error("Absolute path cannot be empty")]
    EmptyAbsolutePath,
    #[error("Invalid JSON content: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("JSON content must be an object, got {0}")]
    JsonNotAnObject(&'static str),
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// Failure to add rules to the active set. Nothing from the batch is registered.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Rule id {0} is already registered")]
    IdCollision(RuleId),
    #[error("Cannot register an empty batch of rules")]
    EmptyBatch,
}

/// Interception outcomes that are not a decision.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InterceptError {
    #[error("Request {method} {uri} didn't match any configured response")]
    UnmatchedStrictRequest { method: Method, uri: Uri },
    #[error("Request interception was cancelled")]
    Cancelled,
}

/// Failures of assertions over the observed request log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssertionError {
    #[error("No received HTTP request matches the provided predicate ({observed} requests observed)")]
    NoRequestMatched { observed: usize },
    #[error("Assertion over observed requests was cancelled")]
    Cancelled,
}

/// Any error raised by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Intercept(#[from] InterceptError),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
}
