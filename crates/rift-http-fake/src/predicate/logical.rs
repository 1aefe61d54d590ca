//! Logical combinators over predicates: AtLeastOne (OR), AllOf (AND), Not.
//!
//! Children are evaluated in order, one at a time, and evaluation stops as soon as
//! the outcome is known.

use super::{RequestPredicate, SharedPredicate};
use crate::error::ConfigurationError;
use crate::request::InterceptedRequest;
use async_trait::async_trait;
use std::sync::Arc;

/// Satisfied when any child predicate is.
#[derive(Debug, Clone)]
pub struct AtLeastOne {
    predicates: Vec<SharedPredicate>,
}

impl AtLeastOne {
    /// Fails with [`ConfigurationError::EmptyAtLeastOne`] when `predicates` is empty.
    pub fn new<I>(predicates: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = SharedPredicate>,
    {
        let predicates: Vec<_> = predicates.into_iter().collect();
        if predicates.is_empty() {
            return Err(ConfigurationError::EmptyAtLeastOne);
        }
        Ok(Self { predicates })
    }

    pub(super) fn pair(first: SharedPredicate, second: SharedPredicate) -> Self {
        Self {
            predicates: vec![first, second],
        }
    }
}

#[async_trait]
impl RequestPredicate for AtLeastOne {
    async fn is_satisfied_by(&self, request: &InterceptedRequest) -> bool {
        for predicate in &self.predicates {
            if predicate.is_satisfied_by(request).await {
                return true;
            }
        }
        false
    }
}

/// Satisfied when every child predicate is.
///
/// Rules already combine their predicates this way; `AllOf` exists to nest a
/// conjunction inside an [`AtLeastOne`].
#[derive(Debug, Clone)]
pub struct AllOf {
    predicates: Vec<SharedPredicate>,
}

impl AllOf {
    /// Fails with [`ConfigurationError::EmptyAllOf`] when `predicates` is empty.
    pub fn new<I>(predicates: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = SharedPredicate>,
    {
        let predicates: Vec<_> = predicates.into_iter().collect();
        if predicates.is_empty() {
            return Err(ConfigurationError::EmptyAllOf);
        }
        Ok(Self { predicates })
    }

    pub(super) fn pair(first: SharedPredicate, second: SharedPredicate) -> Self {
        Self {
            predicates: vec![first, second],
        }
    }
}

#[async_trait]
impl RequestPredicate for AllOf {
    async fn is_satisfied_by(&self, request: &InterceptedRequest) -> bool {
        for predicate in &self.predicates {
            if !predicate.is_satisfied_by(request).await {
                return false;
            }
        }
        true
    }
}

/// Negates the inner predicate.
#[derive(Debug, Clone)]
pub struct Not {
    inner: SharedPredicate,
}

impl Not {
    /// Negate `inner`.
    pub fn new<P: RequestPredicate + 'static>(inner: P) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

#[async_trait]
impl RequestPredicate for Not {
    async fn is_satisfied_by(&self, request: &InterceptedRequest) -> bool {
        !self.inner.is_satisfied_by(request).await
    }
}
