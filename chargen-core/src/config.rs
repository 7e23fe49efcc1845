//! Generator configuration.

use crate::narrative::{ClaudeTextGenerator, Storyteller, DEFAULT_TEXT_TIMEOUT};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_MODEL: &str = "CHARGEN_MODEL";
pub const ENV_TEXT_TIMEOUT: &str = "CHARGEN_TEXT_TIMEOUT_SECS";
pub const ENV_DISABLE_AI: &str = "CHARGEN_DISABLE_AI";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Settings for the optional text generator.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Anthropic API key. Without one, names and backstories are local.
    pub api_key: Option<String>,

    /// Model override for text generation.
    pub model: Option<String>,

    /// Upper bound on a single name or backstory request.
    pub text_timeout: Duration,

    /// Whether to use the text generator at all.
    pub ai_enabled: bool,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("text_timeout", &self.text_timeout)
            .field("ai_enabled", &self.ai_enabled)
            .finish()
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            text_timeout: DEFAULT_TEXT_TIMEOUT,
            ai_enabled: true,
        }
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            api_key: lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()),
            model: lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()),
            ..Self::default()
        };

        if let Some(value) = lookup(ENV_TEXT_TIMEOUT) {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: ENV_TEXT_TIMEOUT,
                    value: value.clone(),
                })?;
            config.text_timeout = Duration::from_secs(secs);
        }

        if let Some(value) = lookup(ENV_DISABLE_AI) {
            config.ai_enabled = !parse_flag(ENV_DISABLE_AI, &value)?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_text_timeout(mut self, timeout: Duration) -> Self {
        self.text_timeout = timeout;
        self
    }

    /// Turn the text generator off regardless of the API key.
    pub fn offline(mut self) -> Self {
        self.ai_enabled = false;
        self
    }

    /// Whether a text generator will be built.
    pub fn uses_text_generator(&self) -> bool {
        self.ai_enabled && self.api_key.is_some()
    }

    /// Build the storyteller these settings describe.
    ///
    /// A client that cannot be constructed is logged and replaced by local
    /// text.
    pub fn storyteller(&self) -> Storyteller {
        let key = match (&self.api_key, self.ai_enabled) {
            (Some(key), true) => key,
            _ => return Storyteller::offline().with_timeout(self.text_timeout),
        };

        match claude::Claude::with_timeout(key.clone(), self.text_timeout) {
            Ok(client) => {
                let client = match &self.model {
                    Some(model) => client.with_model(model.clone()),
                    None => client,
                };
                info!(model = client.model(), "Text generation enabled");
                Storyteller::new(ClaudeTextGenerator::new(client)).with_timeout(self.text_timeout)
            }
            Err(e) => {
                warn!(error = %e, "Could not create text generation client, using local text");
                Storyteller::offline().with_timeout(self.text_timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_empty_environment() {
        let config = GeneratorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert!(!config.uses_text_generator());
        assert!(!config.storyteller().is_online());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_MODEL, "claude-3-5-haiku-latest"),
            (ENV_TEXT_TIMEOUT, "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model.as_deref(), Some("claude-3-5-haiku-latest"));
        assert_eq!(config.text_timeout, Duration::from_secs(5));
        assert!(config.uses_text_generator());
        assert!(config.storyteller().is_online());
    }

    #[test]
    fn test_disable_flag() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_DISABLE_AI, "true"),
        ]))
        .unwrap();
        assert!(!config.uses_text_generator());
        assert!(!config.storyteller().is_online());
    }

    #[test]
    fn test_blank_key_is_absent() {
        let config = GeneratorConfig::from_lookup(lookup(&[(ENV_API_KEY, "  ")])).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_invalid_timeout() {
        let err = GeneratorConfig::from_lookup(lookup(&[(ENV_TEXT_TIMEOUT, "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: ENV_TEXT_TIMEOUT,
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeneratorConfig::new().with_api_key("sk-secret");
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}
