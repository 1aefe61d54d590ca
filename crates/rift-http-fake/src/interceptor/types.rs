//! Value types shared by the interceptor and its callers.

use crate::rule::{ConfiguredResponse, Rule};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// What happens to a request that no rule matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterceptionBehaviour {
    /// Unmatched requests fail with [`crate::InterceptError::UnmatchedStrictRequest`].
    Strict,
    /// Unmatched requests pass through to the real client pipeline.
    #[default]
    Lax,
}

impl fmt::Display for InterceptionBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterceptionBehaviour::Strict => write!(f, "strict"),
            InterceptionBehaviour::Lax => write!(f, "lax"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown interception behaviour '{0}', expected 'strict' or 'lax'")]
pub struct UnknownBehaviour(pub String);

impl FromStr for InterceptionBehaviour {
    type Err = UnknownBehaviour;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(InterceptionBehaviour::Strict),
            "lax" => Ok(InterceptionBehaviour::Lax),
            _ => Err(UnknownBehaviour(s.to_string())),
        }
    }
}

/// Identifier of a registered rule, unique for the lifetime of its interceptor.
///
/// Ids are allocated in increasing order, so ordering by id is registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub(crate) u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule-{}", self.0)
    }
}

/// Decision for one intercepted request.
#[derive(Debug, Clone)]
pub enum InterceptionResult {
    /// The first registered rule whose predicates all hold.
    Matched(Arc<Rule>),
    /// No rule matched and the interceptor is lax.
    NotMatched,
}

impl InterceptionResult {
    /// Whether a rule answered the request.
    pub fn is_matched(&self) -> bool {
        matches!(self, InterceptionResult::Matched(_))
    }

    /// The matching rule, `None` when the request passes through.
    pub fn rule(&self) -> Option<&Arc<Rule>> {
        match self {
            InterceptionResult::Matched(rule) => Some(rule),
            InterceptionResult::NotMatched => None,
        }
    }

    /// Response of the matching rule.
    pub fn response(&self) -> Option<&ConfiguredResponse> {
        self.rule().map(|rule| rule.response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behaviour_parsing() {
        assert_eq!("Strict".parse(), Ok(InterceptionBehaviour::Strict));
        assert_eq!(" lax ".parse(), Ok(InterceptionBehaviour::Lax));
        assert!("loose".parse::<InterceptionBehaviour>().is_err());
        assert_eq!(InterceptionBehaviour::default(), InterceptionBehaviour::Lax);
    }

    #[test]
    fn test_rule_id_display_and_order() {
        assert_eq!(RuleId(3).to_string(), "rule-3");
        assert!(RuleId(1) < RuleId(2));
    }
}
