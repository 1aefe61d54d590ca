//! Interceptor configuration.
//!
//! ```yaml
//! behaviour: strict
//! ```

use crate::interceptor::InterceptionBehaviour;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable read by [`InterceptorConfig::from_env`].
pub const BEHAVIOUR_ENV_VAR: &str = "RIFT_FAKE_BEHAVIOUR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterceptorConfig {
    /// How unmatched requests are treated. Defaults to lax.
    #[serde(default)]
    pub behaviour: InterceptionBehaviour,
}

impl InterceptorConfig {
    /// Load settings from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read interceptor config {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse settings from YAML text. Missing fields take their defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, anyhow::Error> {
        let config: InterceptorConfig = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Read the behaviour from `RIFT_FAKE_BEHAVIOUR`, falling back to the default
    /// when the variable is unset.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let behaviour = match lookup(BEHAVIOUR_ENV_VAR) {
            Some(value) => value
                .parse()
                .with_context(|| format!("Invalid {BEHAVIOUR_ENV_VAR}"))?,
            None => InterceptionBehaviour::default(),
        };
        Ok(Self { behaviour })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_parsing() {
        let config = InterceptorConfig::from_yaml_str("behaviour: strict").unwrap();
        assert_eq!(config.behaviour, InterceptionBehaviour::Strict);

        let config = InterceptorConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.behaviour, InterceptionBehaviour::Lax);

        assert!(InterceptorConfig::from_yaml_str("behaviour: sometimes").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "behaviour: lax").unwrap();

        let config = InterceptorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.behaviour, InterceptionBehaviour::Lax);
    }

    #[test]
    fn test_missing_file_names_path() {
        let error = InterceptorConfig::from_file("/nonexistent/rift-fake.yaml").unwrap_err();
        assert!(error.to_string().contains("/nonexistent/rift-fake.yaml"));
    }

    #[test]
    fn test_env_lookup() {
        let strict = InterceptorConfig::from_lookup(|_| Some("STRICT".to_string())).unwrap();
        assert_eq!(strict.behaviour, InterceptionBehaviour::Strict);

        let unset = InterceptorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(unset, InterceptorConfig::default());

        let error = InterceptorConfig::from_lookup(|_| Some("loose".to_string())).unwrap_err();
        assert!(format!("{error:#}").contains("Unknown interception behaviour 'loose'"));
    }
}
