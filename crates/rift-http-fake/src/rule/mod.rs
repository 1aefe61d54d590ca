//! Rules: ordered predicates paired with the response to return when all hold.
//!
//! - `builder`: [`RuleBuilder`] accumulating predicates and a response
//! - `response`: [`ConfiguredResponse`]

mod builder;
mod response;

pub use builder::RuleBuilder;
pub use response::ConfiguredResponse;

use crate::error::ConfigurationError;
use crate::predicate::SharedPredicate;
use crate::request::InterceptedRequest;

/// An immutable, non-empty list of predicates and the response to substitute when
/// every predicate is satisfied.
#[derive(Debug)]
pub struct Rule {
    name: Option<String>,
    predicates: Vec<SharedPredicate>,
    response: ConfiguredResponse,
}

impl Rule {
    /// Start building a rule.
    pub fn builder() -> RuleBuilder {
        RuleBuilder::new()
    }

    /// Create a rule directly. Fails when `predicates` is empty, since such a rule
    /// would match every request.
    pub fn new(
        predicates: Vec<SharedPredicate>,
        response: ConfiguredResponse,
    ) -> Result<Self, ConfigurationError> {
        if predicates.is_empty() {
            return Err(ConfigurationError::NoPredicates);
        }
        Ok(Self {
            name: None,
            predicates,
            response,
        })
    }

    pub(crate) fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Evaluate predicates in order, stopping at the first one that is not satisfied.
    pub async fn matches(&self, request: &InterceptedRequest) -> bool {
        for predicate in &self.predicates {
            if !predicate.is_satisfied_by(request).await {
                return false;
            }
        }
        true
    }

    /// Name given through [`RuleBuilder::named`], if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of predicates, counting each combinator once.
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Response returned when the rule matches.
    pub fn response(&self) -> &ConfiguredResponse {
        &self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::test_support::{Fixed, Unreachable};
    use hyper::{Method, Uri};
    use std::sync::Arc;

    fn any_request() -> InterceptedRequest {
        InterceptedRequest::new(Method::GET, Uri::from_static("https://pablocompany.com/"))
    }

    #[tokio::test]
    async fn test_all_predicates_must_hold() {
        let first = Fixed::new(true);
        let second = Fixed::new(true);
        let rule = Rule::new(
            vec![first.clone() as SharedPredicate, second.clone()],
            ConfiguredResponse::default(),
        )
        .unwrap();

        assert!(rule.matches(&any_request()).await);
        assert_eq!((first.calls(), second.calls()), (1, 1));
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let rule = Rule::new(
            vec![Fixed::new(false) as SharedPredicate, Arc::new(Unreachable)],
            ConfiguredResponse::default(),
        )
        .unwrap();

        assert!(!rule.matches(&any_request()).await);
    }

    #[test]
    fn test_empty_predicates_rejected() {
        assert!(matches!(
            Rule::new(Vec::new(), ConfiguredResponse::default()),
            Err(ConfigurationError::NoPredicates)
        ));
    }
}
