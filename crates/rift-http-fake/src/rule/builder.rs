use super::{ConfiguredResponse, Rule};
use crate::error::ConfigurationError;
use crate::predicate::{
    AbsolutePath, AtLeastOne, HeaderEquals, HttpMethod, JsonContent, QueryParams,
    RequestPredicate, SharedPredicate,
};
use hyper::Method;
use serde::Serialize;
use std::sync::Arc;

/// Accumulates predicates, in evaluation order, and the response of a [`Rule`].
///
/// Predicate constructors that can fail record the first error; [`RuleBuilder::build`]
/// reports it instead of producing a rule.
///
/// ```
/// use rift_http_fake::{ConfiguredResponse, Rule};
/// use hyper::{Method, StatusCode};
///
/// let rule = Rule::builder()
///     .with_method(Method::GET)
///     .with_absolute_path("/api/endpoint/path")
///     .respond_with(ConfiguredResponse::new(StatusCode::NO_CONTENT))
///     .build()
///     .unwrap();
/// assert_eq!(rule.predicate_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RuleBuilder {
    name: Option<String>,
    predicates: Vec<SharedPredicate>,
    response: ConfiguredResponse,
    error: Option<ConfigurationError>,
}

impl RuleBuilder {
    /// Same as [`Rule::builder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the rule for log output.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a predicate. Predicates are evaluated in the order they were added.
    pub fn with_predicate<P: RequestPredicate + 'static>(self, predicate: P) -> Self {
        self.with_shared_predicate(Arc::new(predicate))
    }

    /// Add a predicate already shared with other rules or assertions.
    pub fn with_shared_predicate(mut self, predicate: SharedPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Require the request path to equal `path`, ignoring case.
    pub fn with_absolute_path(self, path: impl Into<String>) -> Self {
        self.with_fallible(AbsolutePath::new(path))
    }

    /// Require the request method.
    pub fn with_method(self, method: Method) -> Self {
        self.with_predicate(HttpMethod::new(method))
    }

    /// Require every given query parameter with exactly its value.
    pub fn with_query_params<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.with_fallible(QueryParams::new(params))
    }

    /// Require the body to be a JSON object with exactly the keys and values of
    /// `content`. Serialization failures and non-object content surface from `build()`.
    pub fn with_json_content<T: Serialize + ?Sized>(self, content: &T) -> Self {
        self.with_fallible(JsonContent::from_serializable(content))
    }

    /// Require a header with the given value.
    pub fn with_header(self, name: &str, value: &str) -> Self {
        self.with_fallible(HeaderEquals::new(name, value))
    }

    /// Add a disjunction of the given predicates.
    pub fn with_at_least_one<I>(self, predicates: I) -> Self
    where
        I: IntoIterator<Item = SharedPredicate>,
    {
        self.with_fallible(AtLeastOne::new(predicates))
    }

    /// Response returned when the rule matches. Defaults to `200 OK` with no body.
    pub fn respond_with(mut self, response: ConfiguredResponse) -> Self {
        self.response = response;
        self
    }

    /// Finish the rule.
    ///
    /// Returns the first configuration error hit while adding predicates, otherwise
    /// [`ConfigurationError::NoPredicates`] when none were added.
    pub fn build(self) -> Result<Rule, ConfigurationError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(Rule::new(self.predicates, self.response)?.with_name(self.name))
    }

    fn with_fallible<P: RequestPredicate + 'static>(
        mut self,
        predicate: Result<P, ConfigurationError>,
    ) -> Self {
        match predicate {
            Ok(predicate) => self.with_predicate(predicate),
            Err(error) => {
                self.error.get_or_insert(error);
                self
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::PredicateExt;
    use crate::request::InterceptedRequest;
    use hyper::{StatusCode, Uri};

    #[test]
    fn test_no_predicates_fails() {
        let result = Rule::builder()
            .respond_with(ConfiguredResponse::new(StatusCode::OK))
            .build();

        let error = result.unwrap_err();
        assert!(matches!(error, ConfigurationError::NoPredicates));
        assert!(error
            .to_string()
            .contains("No request specifications configured"));
    }

    #[test]
    fn test_first_error_reported() {
        let empty: [(&str, &str); 0] = [];
        let result = Rule::builder()
            .with_absolute_path("")
            .with_query_params(empty)
            .build();

        assert!(matches!(result, Err(ConfigurationError::EmptyAbsolutePath)));
    }

    #[test]
    fn test_invalid_json_content_reported() {
        let result = Rule::builder().with_json_content(&vec![1, 2, 3]).build();
        assert!(matches!(
            result,
            Err(ConfigurationError::JsonNotAnObject("an array"))
        ));
    }

    #[tokio::test]
    async fn test_predicates_kept_in_order() {
        let rule = Rule::builder()
            .named("orders")
            .with_method(Method::POST)
            .with_absolute_path("/orders")
            .with_header("x-tenant", "acme")
            .with_json_content(&serde_json::json!({"sku": "A-1"}))
            .respond_with(ConfiguredResponse::new(StatusCode::CREATED))
            .build()
            .unwrap();

        assert_eq!(rule.name(), Some("orders"));
        assert_eq!(rule.predicate_count(), 4);
        assert_eq!(rule.response().status(), StatusCode::CREATED);

        let request = InterceptedRequest::new(Method::POST, Uri::from_static("/orders"))
            .with_header(
                hyper::header::HeaderName::from_static("x-tenant"),
                hyper::header::HeaderValue::from_static("acme"),
            )
            .with_body(r#"{"sku":"A-1"}"#);
        assert!(rule.matches(&request).await);
    }

    #[tokio::test]
    async fn test_at_least_one() {
        let rule = Rule::builder()
            .with_at_least_one([
                AbsolutePath::new("/a").unwrap().shared(),
                AbsolutePath::new("/b").unwrap().shared(),
            ])
            .build()
            .unwrap();

        let b = InterceptedRequest::new(Method::GET, Uri::from_static("/b"));
        let c = InterceptedRequest::new(Method::GET, Uri::from_static("/c"));
        assert!(rule.matches(&b).await);
        assert!(!rule.matches(&c).await);
    }
}
