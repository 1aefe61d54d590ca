//! Query parameter predicate and query string parsing.

use super::folded::FoldedText;
use super::RequestPredicate;
use crate::error::ConfigurationError;
use crate::request::InterceptedRequest;
use async_trait::async_trait;
use std::collections::HashMap;

/// Satisfied when every configured parameter is present with exactly the expected value.
///
/// Parameter names are looked up case-insensitively, values are compared exactly.
/// Extra parameters on the request are ignored.
#[derive(Debug, Clone)]
pub struct QueryParams {
    expected: Vec<(FoldedText, String)>,
}

impl QueryParams {
    /// Fails with [`ConfigurationError::EmptyQueryParams`] when `params` is empty.
    pub fn new<I, K, V>(params: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let expected: Vec<_> = params
            .into_iter()
            .map(|(name, value)| (FoldedText::new(name), value.into()))
            .collect();
        if expected.is_empty() {
            return Err(ConfigurationError::EmptyQueryParams);
        }
        Ok(Self { expected })
    }
}

#[async_trait]
impl RequestPredicate for QueryParams {
    async fn is_satisfied_by(&self, request: &InterceptedRequest) -> bool {
        let actual = parse_query_string(request.query());
        self.expected.iter().all(|(name, expected_value)| {
            actual
                .get(&name.folded)
                .is_some_and(|actual_value| actual_value == expected_value)
        })
    }
}

/// Parse a query string into a map keyed by lowercased parameter name.
///
/// Names and values are percent-decoded with `+` read as a space. A pair without
/// `=`, such as `?flag`, has no name and is skipped; `flag=` keeps its empty value.
/// A repeated name maps to its values joined by `,`.
pub fn parse_query_string(query: Option<&str>) -> HashMap<String, String> {
    let mut params: HashMap<String, String> = HashMap::new();
    let Some(query) = query else {
        return params;
    };
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = decode_component(name).to_lowercase();
        let value = decode_component(value);
        params
            .entry(name)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    params
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| spaced.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::{Method, Uri};

    fn get(uri: &'static str) -> InterceptedRequest {
        InterceptedRequest::new(Method::GET, Uri::from_static(uri))
    }

    fn first_and_second() -> QueryParams {
        QueryParams::new([("First", "firstValue"), ("Second", "secondValue")]).unwrap()
    }

    #[tokio::test]
    async fn test_all_params_present() {
        let request = get("https://pablocompany.com/api/endpoint/path?First=firstValue&Second=secondValue");
        assert!(first_and_second().is_satisfied_by(&request).await);
    }

    #[tokio::test]
    async fn test_extra_params_ignored() {
        let request = get("https://pablocompany.com/p?Third=x&Second=secondValue&First=firstValue");
        assert!(first_and_second().is_satisfied_by(&request).await);
    }

    #[tokio::test]
    async fn test_missing_param() {
        let request = get("https://pablocompany.com/path?First=firstValue");
        assert!(!first_and_second().is_satisfied_by(&request).await);
    }

    #[tokio::test]
    async fn test_different_value() {
        let request = get("https://pablocompany.com/path?First=firstValue&Second=different");
        assert!(!first_and_second().is_satisfied_by(&request).await);
    }

    #[tokio::test]
    async fn test_no_query_string() {
        assert!(!first_and_second().is_satisfied_by(&get("https://pablocompany.com/path")).await);
    }

    #[test]
    fn test_empty_params_rejected() {
        let empty: [(&str, &str); 0] = [];
        assert!(matches!(
            QueryParams::new(empty),
            Err(ConfigurationError::EmptyQueryParams)
        ));
    }

    #[test]
    fn test_query_string_parsing() {
        let params = parse_query_string(Some("page=1&Sort=desc&empty=&name=hello%20big+world"));
        assert_eq!(params.get("page"), Some(&"1".to_string()));
        assert_eq!(params.get("sort"), Some(&"desc".to_string()));
        assert_eq!(params.get("empty"), Some(&String::new()));
        assert_eq!(params.get("name"), Some(&"hello big world".to_string()));

        let repeated = parse_query_string(Some("tag=a&tag=b"));
        assert_eq!(repeated.get("tag"), Some(&"a,b".to_string()));

        assert!(parse_query_string(None).is_empty());
    }

    #[test]
    fn test_pair_without_equals_is_skipped() {
        let params = parse_query_string(Some("flag&page=1&&other"));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("page"), Some(&"1".to_string()));
        assert!(!params.contains_key("flag"));
        assert!(!params.contains_key("other"));
    }

    #[tokio::test]
    async fn test_empty_value_needs_equals_sign() {
        let predicate = QueryParams::new([("flag", "")]).unwrap();
        assert!(!predicate.is_satisfied_by(&get("https://pablocompany.com/p?flag")).await);
        assert!(predicate.is_satisfied_by(&get("https://pablocompany.com/p?flag=")).await);
    }
}
