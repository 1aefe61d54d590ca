//! Request predicates used by rules to decide whether a request is intercepted.
//!
//! Every predicate implements [`RequestPredicate`]. Concrete predicates inspect one
//! aspect of the request; combinators hold further predicates, so they nest freely.
//!
//! # Module Structure
//!
//! - `folded` - configured text with its lowercase form
//! - `path` - absolute path equality
//! - `method` - HTTP method equality
//! - `query` - query parameter subset matching and query string parsing
//! - `json_body` - flat JSON body equality
//! - `header` - header value equality
//! - `logical` - AtLeastOne (OR), AllOf (AND), Not

mod folded;
mod header;
mod json_body;
mod logical;
mod method;
mod path;
mod query;

use crate::request::InterceptedRequest;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

pub use header::HeaderEquals;
pub use json_body::JsonContent;
pub use logical::{AllOf, AtLeastOne, Not};
pub use method::HttpMethod;
pub use path::AbsolutePath;
pub use query::{parse_query_string, QueryParams};

/// Decides whether an intercepted request satisfies a condition.
///
/// Evaluation may suspend, so the contract is asynchronous. Dropping the returned
/// future cancels the evaluation. Implementations must not panic for a well-formed
/// request and must not touch interceptor state.
#[async_trait]
pub trait RequestPredicate: Send + Sync + fmt::Debug {
    async fn is_satisfied_by(&self, request: &InterceptedRequest) -> bool;
}

/// Type-erased predicate shared between rules and combinators.
pub type SharedPredicate = Arc<dyn RequestPredicate>;

/// Convenience combinators available on every concrete predicate.
pub trait PredicateExt: RequestPredicate + Sized + 'static {
    /// Erase the concrete type.
    fn shared(self) -> SharedPredicate {
        Arc::new(self)
    }

    /// Satisfied when `self` or `other` is, evaluating `self` first.
    fn or<P: RequestPredicate + 'static>(self, other: P) -> AtLeastOne {
        AtLeastOne::pair(self.shared(), other.shared())
    }

    /// Satisfied when `self` and `other` are, evaluating `self` first.
    fn and<P: RequestPredicate + 'static>(self, other: P) -> AllOf {
        AllOf::pair(self.shared(), other.shared())
    }

    fn negate(self) -> Not {
        Not::new(self)
    }
}

impl<T: RequestPredicate + 'static> PredicateExt for T {}
