//! Error handling for the version engine and moderation lifecycle
//!
//! This module provides comprehensive error types with recovery guidance
//! using the thiserror crate for ergonomic error handling.

use thiserror::Error;

/// Main error type for version engine and moderation operations
#[derive(Error, Debug)]
pub enum ForgeError {
    // Version validation errors
    #[error("無効なバージョン形式です: {raw}")]
    InvalidVersionFormat { raw: String },

    #[error("無効なバージョン制約です: {raw}")]
    InvalidConstraintFormat { raw: String },

    // Spam check errors
    #[error("スパムチェックに失敗しました: {message}")]
    SpamCheckUnavailable { message: String },

    #[error("スパムチェックがタイムアウトしました")]
    SpamCheckTimeout,

    // Configuration errors
    #[error("設定の読み込みに失敗しました: {message}")]
    ConfigError { message: String },
}

impl ForgeError {
    /// Get the input field associated with this error, if it is a
    /// field-level validation error
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidVersionFormat { .. } => Some("version"),
            Self::InvalidConstraintFormat { .. } => Some("constraint"),
            Self::SpamCheckUnavailable { .. }
            | Self::SpamCheckTimeout
            | Self::ConfigError { .. } => None,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Validation errors are resolved by correcting the input; spam check
    /// failures are resolved by trying again later. Configuration errors
    /// require fixing the configuration file itself.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ConfigError { .. })
    }

    /// Check if this error means "check failed, try again later"
    ///
    /// Distinguishes a failed spam check (state unchanged, retryable) from
    /// a completed check that found the comment clean.
    pub fn is_transient_check_failure(&self) -> bool {
        matches!(
            self,
            Self::SpamCheckUnavailable { .. } | Self::SpamCheckTimeout
        )
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidVersionFormat { .. } => vec![
                "SemVer形式（例: 1.2.3）で指定してください",
                "先頭のvは省略可能です（例: v1.2.3）",
            ],
            Self::InvalidConstraintFormat { .. } => vec![
                "SemVer範囲構文（例: ~1.2.0、^1.0.0、>=1.0.0, <2.0.0）で指定してください",
            ],
            Self::SpamCheckUnavailable { .. } => vec![
                "しばらく待ってから再試行してください",
                "スパムチェックAPIのステータスを確認してください",
            ],
            Self::SpamCheckTimeout => vec![
                "ネットワーク環境を確認してください",
                "設定でタイムアウト時間を延長できます",
            ],
            Self::ConfigError { .. } => vec![
                ".forge-config.yamlの構文を確認してください",
                "環境変数が正しく設定されているか確認してください",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidVersionFormat { .. } => "INVALID_VERSION_FORMAT",
            Self::InvalidConstraintFormat { .. } => "INVALID_CONSTRAINT_FORMAT",
            Self::SpamCheckUnavailable { .. } => "SPAM_CHECK_UNAVAILABLE",
            Self::SpamCheckTimeout => "SPAM_CHECK_TIMEOUT",
            Self::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_version_format_error() {
        let error = ForgeError::InvalidVersionFormat {
            raw: "not-a-version".to_string(),
        };

        assert_eq!(error.field(), Some("version"));
        assert!(error.is_recoverable());
        assert!(!error.is_transient_check_failure());
        assert_eq!(error.code(), "INVALID_VERSION_FORMAT");
        assert!(error.suggested_actions().len() > 0);
    }

    #[test]
    fn test_invalid_version_format_carries_raw_input() {
        let error = ForgeError::InvalidVersionFormat {
            raw: "1.2.banana".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("1.2.banana"));
        assert!(display.contains("無効なバージョン形式"));
    }

    #[test]
    fn test_invalid_constraint_format_error() {
        let error = ForgeError::InvalidConstraintFormat {
            raw: ">>nope".to_string(),
        };

        assert_eq!(error.field(), Some("constraint"));
        assert!(error.is_recoverable());
        assert_eq!(error.code(), "INVALID_CONSTRAINT_FORMAT");
        let display = format!("{}", error);
        assert!(display.contains(">>nope"));
    }

    #[test]
    fn test_spam_check_unavailable_error() {
        let error = ForgeError::SpamCheckUnavailable {
            message: "connection refused".to_string(),
        };

        assert_eq!(error.field(), None);
        assert!(error.is_recoverable());
        assert!(error.is_transient_check_failure());
        assert_eq!(error.code(), "SPAM_CHECK_UNAVAILABLE");
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn test_spam_check_timeout_error() {
        let error = ForgeError::SpamCheckTimeout;

        assert!(error.is_recoverable());
        assert!(error.is_transient_check_failure());
        assert_eq!(error.code(), "SPAM_CHECK_TIMEOUT");
        let actions = error.suggested_actions();
        assert!(actions.iter().any(|&a| a.contains("タイムアウト")));
    }

    #[test]
    fn test_config_error() {
        let error = ForgeError::ConfigError {
            message: "invalid yaml".to_string(),
        };

        assert_eq!(error.field(), None);
        assert!(!error.is_recoverable());
        assert!(!error.is_transient_check_failure());
        assert_eq!(error.code(), "CONFIG_ERROR");
        assert!(error.to_string().contains("invalid yaml"));
    }
}
