//! JSON body predicate.
//!
//! Both the configured content and the request body are read as a flat object:
//! top-level keys mapped to the JSON text of their values. Nested values are compared
//! by their serialized form.

use super::folded::FoldedText;
use super::RequestPredicate;
use crate::error::ConfigurationError;
use crate::request::InterceptedRequest;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// Satisfied when the request body holds the same top-level keys and values as the
/// configured JSON object.
///
/// Key names are compared case-insensitively unless [`JsonContent::case_sensitive`]
/// is enabled. Values are always compared exactly.
#[derive(Debug, Clone)]
pub struct JsonContent {
    expected: Vec<(FoldedText, String)>,
    case_sensitive: bool,
}

impl JsonContent {
    /// Parse JSON text. Fails when the text is not a JSON object.
    pub fn parse(content: &str) -> Result<Self, ConfigurationError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_json(value)
    }

    /// Serialize any value to JSON. Fails when it does not serialize to an object.
    pub fn from_serializable<T: Serialize + ?Sized>(
        content: &T,
    ) -> Result<Self, ConfigurationError> {
        Self::from_json(serde_json::to_value(content)?)
    }

    fn from_json(value: Value) -> Result<Self, ConfigurationError> {
        match value {
            Value::Object(object) => Ok(Self {
                expected: object
                    .iter()
                    .map(|(key, value)| (FoldedText::new(key.as_str()), value.to_string()))
                    .collect(),
                case_sensitive: false,
            }),
            other => Err(ConfigurationError::JsonNotAnObject(json_kind(&other))),
        }
    }

    /// Compare key names exactly instead of ignoring case.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Pair every configured key with a distinct body key holding the same value.
    ///
    /// Without case sensitivity a configured key first claims the body key spelled
    /// exactly like it, then any unclaimed body key equal to it ignoring case.
    fn matches_object(&self, actual: &Map<String, Value>) -> bool {
        if actual.len() != self.expected.len() {
            return false;
        }
        if self.case_sensitive {
            return self.expected.iter().all(|(key, value)| {
                actual
                    .get(&key.original)
                    .is_some_and(|actual_value| actual_value.to_string() == *value)
            });
        }

        let mut unclaimed: Vec<(String, &str, String)> = actual
            .iter()
            .map(|(key, value)| (key.to_lowercase(), key.as_str(), value.to_string()))
            .collect();
        let (exact, folded): (Vec<_>, Vec<_>) = self
            .expected
            .iter()
            .partition(|(key, _)| actual.contains_key(&key.original));

        for (key, value) in exact {
            let Some(index) = unclaimed.iter().position(|(_, original, actual_value)| {
                *original == key.original && actual_value == value
            }) else {
                return false;
            };
            unclaimed.swap_remove(index);
        }
        for (key, value) in folded {
            let Some(index) = unclaimed.iter().position(|(lower, _, actual_value)| {
                *lower == key.folded && actual_value == value
            }) else {
                return false;
            };
            unclaimed.swap_remove(index);
        }
        true
    }
}

#[async_trait]
impl RequestPredicate for JsonContent {
    async fn is_satisfied_by(&self, request: &InterceptedRequest) -> bool {
        if request.body().is_empty() {
            return false;
        }
        match serde_json::from_slice::<Map<String, Value>>(request.body()) {
            Ok(actual) => self.matches_object(&actual),
            Err(_) => false,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
