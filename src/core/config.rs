//! Configuration structures and types for forge-core
//!
//! This module provides type-safe configuration management with serde
//! support for the version import pipeline and the spam check lifecycle.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Root configuration object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Schema version (required)
    pub version: String,

    /// Import pipeline settings (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import: Option<ImportConfig>,

    /// Spam check settings (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spam: Option<SpamConfig>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            import: None,
            spam: None,
        }
    }
}

/// Import pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ImportConfig {
    /// Additional noise prefixes stripped from SPT import labels
    /// (e.g., "AKI")
    #[serde(skip_serializing_if = "Option::is_none", rename = "noisePrefixes")]
    pub noise_prefixes: Option<Vec<String>>,

    /// Constraint emitted for unrecognized compatibility labels
    /// (default: "0.0.0")
    #[serde(skip_serializing_if = "Option::is_none", rename = "fallbackConstraint")]
    pub fallback_constraint: Option<String>,
}

/// Spam check settings
#[derive(Debug, Serialize, Deserialize)]
pub struct SpamConfig {
    /// Spam-detection API endpoint
    #[serde(rename = "apiUrl")]
    pub api_url: String,

    /// API key, never serialized back out
    #[serde(
        rename = "apiKey",
        skip_serializing,
        deserialize_with = "deserialize_secret"
    )]
    pub api_key: SecretString,

    /// Maximum automatic rechecks per comment (default: 3)
    #[serde(skip_serializing_if = "Option::is_none", rename = "maxRechecks")]
    pub max_rechecks: Option<u32>,

    /// Per-call timeout in seconds (default: 10)
    #[serde(skip_serializing_if = "Option::is_none", rename = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

impl SpamConfig {
    /// Create a config with only the required fields set
    pub fn new(api_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            api_url: api_url.into(),
            api_key,
            max_rechecks: None,
            timeout_secs: None,
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(SecretString::new(value.into()))
}

impl Clone for SpamConfig {
    fn clone(&self) -> Self {
        use secrecy::ExposeSecret;

        Self {
            api_url: self.api_url.clone(),
            api_key: SecretString::new(self.api_key.expose_secret().into()),
            max_rechecks: self.max_rechecks,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config() {
        let config = ForgeConfig::default();

        assert_eq!(config.version, "1.0");
        assert!(config.import.is_none());
        assert!(config.spam.is_none());
    }

    #[test]
    fn test_deserialize_full_config() {
        let yaml = r#"
version: "1.0"
import:
  noisePrefixes:
    - "AKI"
  fallbackConstraint: "0.0.0"
spam:
  apiUrl: "https://spam.example.com/check"
  apiKey: "secret-key"
  maxRechecks: 5
  timeoutSecs: 15
"#;
        let config: ForgeConfig = serde_yaml::from_str(yaml).unwrap();

        let import = config.import.unwrap();
        assert_eq!(import.noise_prefixes, Some(vec!["AKI".to_string()]));
        assert_eq!(import.fallback_constraint, Some("0.0.0".to_string()));

        let spam = config.spam.unwrap();
        assert_eq!(spam.api_url, "https://spam.example.com/check");
        assert_eq!(spam.api_key.expose_secret(), "secret-key");
        assert_eq!(spam.max_rechecks, Some(5));
        assert_eq!(spam.timeout_secs, Some(15));
    }

    #[test]
    fn test_optional_sections_can_be_omitted() {
        let config: ForgeConfig = serde_yaml::from_str("version: \"1.0\"\n").unwrap();

        assert!(config.import.is_none());
        assert!(config.spam.is_none());
    }

    #[test]
    fn test_api_key_is_never_serialized() {
        let config = ForgeConfig {
            version: "1.0".to_string(),
            import: None,
            spam: Some(SpamConfig::new(
                "https://spam.example.com/check",
                SecretString::new("secret-key".into()),
            )),
        };

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("apiUrl"));
        assert!(!yaml.contains("secret-key"));
        assert!(!yaml.contains("apiKey"));
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let spam = SpamConfig::new(
            "https://spam.example.com/check",
            SecretString::new("secret-key".into()),
        );

        let debug = format!("{:?}", spam);
        assert!(!debug.contains("secret-key"));
    }
}
