//! Configuration file loader for forge-core
//!
//! This module provides configuration loading, validation, and merging
//! capabilities.

use lazy_static::lazy_static;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::config::{ForgeConfig, SpamConfig};
use crate::core::error::ForgeError;

/// Configuration file name
const CONFIG_FILENAME: &str = ".forge-config.yaml";

/// Supported schema version
const SCHEMA_VERSION: &str = "1.0";

lazy_static! {
    /// Environment variable pattern (${VAR_NAME})
    static ref ENV_VAR_PATTERN: Regex = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
}

/// Configuration load options
#[derive(Debug, Clone)]
pub struct ConfigLoadOptions {
    /// Project path to load config from
    pub project_path: PathBuf,

    /// Environment variables (overrides and ${VAR} expansion)
    pub env: HashMap<String, String>,
}

impl ConfigLoadOptions {
    /// Options for a project path, capturing the process environment
    pub fn for_project(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            env: env::vars().collect(),
        }
    }
}

/// Configuration validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationResult {
    /// Is configuration valid?
    pub valid: bool,

    /// Validation errors
    pub errors: Vec<ConfigValidationError>,

    /// Validation warnings
    pub warnings: Vec<ConfigValidationWarning>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Field path (e.g., "spam.apiUrl")
    pub field: String,

    /// Error message
    pub message: String,

    /// Expected type/value
    pub expected: Option<String>,

    /// Actual type/value
    pub actual: Option<String>,
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationWarning {
    /// Field path
    pub field: String,

    /// Warning message
    pub message: String,

    /// Suggestion
    pub suggestion: Option<String>,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. Environment variables (FORGE_SPAM_*)
    /// 2. Project config (./.forge-config.yaml)
    /// 3. Global config (~/.forge-config.yaml)
    /// 4. Default values
    pub async fn load(options: ConfigLoadOptions) -> Result<ForgeConfig, ForgeError> {
        let mut configs: Vec<ForgeConfig> = Vec::new();

        // 4. Default values (lowest priority)
        configs.push(ForgeConfig::default());

        // 3. Global config
        if let Some(global_config) = Self::load_global_config().await? {
            configs.push(global_config);
        }

        // 2. Project config
        if let Some(project_config) = Self::load_project_config(&options.project_path).await? {
            configs.push(project_config);
        }

        // Merge, then apply the highest-priority sources
        let mut merged_config = Self::merge_configs(configs);

        // 1. Environment variables (highest priority)
        Self::apply_env_overrides(&mut merged_config, &options.env)?;

        // Expand ${VAR} references
        Self::expand_env_vars(&mut merged_config, &options.env)?;

        Ok(merged_config)
    }

    /// Load global configuration from ~/.forge-config.yaml
    ///
    /// A missing HOME just means no global config.
    async fn load_global_config() -> Result<Option<ForgeConfig>, ForgeError> {
        let Ok(home_dir) = env::var("HOME") else {
            return Ok(None);
        };
        let global_config_path = PathBuf::from(home_dir).join(CONFIG_FILENAME);

        Self::load_config_file(&global_config_path).await
    }

    /// Load project configuration from ./.forge-config.yaml
    async fn load_project_config(project_path: &Path) -> Result<Option<ForgeConfig>, ForgeError> {
        let project_config_path = project_path.join(CONFIG_FILENAME);

        Self::load_config_file(&project_config_path).await
    }

    /// Load configuration from a YAML file
    async fn load_config_file(file_path: &Path) -> Result<Option<ForgeConfig>, ForgeError> {
        let content = match fs::read_to_string(file_path).await {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(ForgeError::ConfigError {
                    message: format!("failed to read {}: {}", file_path.display(), error),
                });
            }
        };

        let config: ForgeConfig =
            serde_yaml::from_str(&content).map_err(|error| ForgeError::ConfigError {
                message: format!("failed to parse {}: {}", file_path.display(), error),
            })?;

        Ok(Some(config))
    }

    /// Merge configurations, later entries taking priority section-wise
    fn merge_configs(configs: Vec<ForgeConfig>) -> ForgeConfig {
        let mut merged = ForgeConfig::default();

        for config in configs {
            merged.version = config.version;
            if config.import.is_some() {
                merged.import = config.import;
            }
            if config.spam.is_some() {
                merged.spam = config.spam;
            }
        }

        merged
    }

    /// Apply FORGE_SPAM_* environment variable overrides
    fn apply_env_overrides(
        config: &mut ForgeConfig,
        env: &HashMap<String, String>,
    ) -> Result<(), ForgeError> {
        let overrides_present = ["FORGE_SPAM_API_URL", "FORGE_SPAM_API_KEY"]
            .iter()
            .any(|key| env.contains_key(*key));

        if overrides_present && config.spam.is_none() {
            config.spam = Some(SpamConfig::new(String::new(), SecretString::new("".into())));
        }

        let Some(spam) = config.spam.as_mut() else {
            return Ok(());
        };

        if let Some(url) = env.get("FORGE_SPAM_API_URL") {
            spam.api_url = url.clone();
        }
        if let Some(key) = env.get("FORGE_SPAM_API_KEY") {
            spam.api_key = SecretString::new(key.clone().into());
        }
        if let Some(raw) = env.get("FORGE_SPAM_MAX_RECHECKS") {
            let value = raw.parse::<u32>().map_err(|_| ForgeError::ConfigError {
                message: format!("FORGE_SPAM_MAX_RECHECKS is not an integer: {}", raw),
            })?;
            spam.max_rechecks = Some(value);
        }
        if let Some(raw) = env.get("FORGE_SPAM_TIMEOUT_SECS") {
            let value = raw.parse::<u64>().map_err(|_| ForgeError::ConfigError {
                message: format!("FORGE_SPAM_TIMEOUT_SECS is not an integer: {}", raw),
            })?;
            spam.timeout_secs = Some(value);
        }

        Ok(())
    }

    /// Expand ${VAR} references in string fields
    fn expand_env_vars(
        config: &mut ForgeConfig,
        env: &HashMap<String, String>,
    ) -> Result<(), ForgeError> {
        if let Some(spam) = config.spam.as_mut() {
            spam.api_url = Self::expand_string(&spam.api_url, env)?;

            let expanded_key = Self::expand_string(spam.api_key.expose_secret(), env)?;
            spam.api_key = SecretString::new(expanded_key.into());
        }

        Ok(())
    }

    /// Expand ${VAR} references in a single string
    fn expand_string(value: &str, env: &HashMap<String, String>) -> Result<String, ForgeError> {
        let mut result = String::with_capacity(value.len());
        let mut last_end = 0;

        for captures in ENV_VAR_PATTERN.captures_iter(value) {
            let whole = captures.get(0).unwrap();
            let name = &captures[1];

            let replacement = env.get(name).ok_or_else(|| ForgeError::ConfigError {
                message: format!("undefined environment variable: {}", name),
            })?;

            result.push_str(&value[last_end..whole.start()]);
            result.push_str(replacement);
            last_end = whole.end();
        }
        result.push_str(&value[last_end..]);

        Ok(result)
    }

    /// Validate a loaded configuration
    pub fn validate(config: &ForgeConfig) -> ConfigValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if config.version != SCHEMA_VERSION {
            errors.push(ConfigValidationError {
                field: "version".to_string(),
                message: "unsupported schema version".to_string(),
                expected: Some(SCHEMA_VERSION.to_string()),
                actual: Some(config.version.clone()),
            });
        }

        if let Some(import) = &config.import {
            if let Some(fallback) = &import.fallback_constraint {
                if semver::VersionReq::parse(fallback).is_err() {
                    errors.push(ConfigValidationError {
                        field: "import.fallbackConstraint".to_string(),
                        message: "not a valid semver range".to_string(),
                        expected: Some("semver range (e.g. ~1.2.0)".to_string()),
                        actual: Some(fallback.clone()),
                    });
                }
            }
        }

        if let Some(spam) = &config.spam {
            if !spam.api_url.starts_with("http://") && !spam.api_url.starts_with("https://") {
                errors.push(ConfigValidationError {
                    field: "spam.apiUrl".to_string(),
                    message: "must be an http(s) URL".to_string(),
                    expected: Some("https://...".to_string()),
                    actual: Some(spam.api_url.clone()),
                });
            }
            if spam.api_key.expose_secret().is_empty() {
                errors.push(ConfigValidationError {
                    field: "spam.apiKey".to_string(),
                    message: "must not be empty".to_string(),
                    expected: None,
                    actual: None,
                });
            }
            if spam.max_rechecks == Some(0) {
                warnings.push(ConfigValidationWarning {
                    field: "spam.maxRechecks".to_string(),
                    message: "automatic rechecks are disabled".to_string(),
                    suggestion: Some("remove the key to use the default of 3".to_string()),
                });
            }
        }

        ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
