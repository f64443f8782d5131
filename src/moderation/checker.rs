//! External spam-detection API client
//!
//! This module defines the collaborator seam for the third-party spam
//! detection service and its HTTP implementation. The lifecycle only sees
//! the trait: a verdict, an optional recheck-after hint, and free-form
//! diagnostic metadata.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::core::config::SpamConfig;
use crate::core::retry::{RetryManager, RetryOptions};

/// Default timeout for a single spam check call
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Payload sent to the spam-detection API for one comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamCheckRequest {
    /// Caller-owned comment identifier
    #[serde(rename = "commentId")]
    pub comment_id: u64,

    /// Comment author display name
    pub author: String,

    /// Comment author email, if known
    #[serde(rename = "authorEmail", skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,

    /// Comment body text
    pub body: String,

    /// Submitter IP address, if captured
    #[serde(rename = "userIp", skip_serializing_if = "Option::is_none")]
    pub user_ip: Option<String>,

    /// Submitter user agent, if captured
    #[serde(rename = "userAgent", skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// When the comment was submitted
    #[serde(rename = "submittedAt", skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,

    /// Service-specific extra fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl SpamCheckRequest {
    /// Create a minimal request from the required fields
    pub fn new(comment_id: u64, author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            comment_id,
            author: author.into(),
            author_email: None,
            body: body.into(),
            user_ip: None,
            user_agent: None,
            submitted_at: None,
            extra: HashMap::new(),
        }
    }
}

/// Verdict returned by the spam-detection API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamVerdict {
    /// Whether the comment was judged to be spam
    pub spam: bool,

    /// Service hint to recheck after this many seconds
    #[serde(rename = "recheckAfter", skip_serializing_if = "Option::is_none")]
    pub recheck_after: Option<u64>,

    /// Free-form diagnostic metadata from the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// Main trait for spam-detection service implementations
///
/// The call is an I/O boundary with its own timeout; a transient failure
/// surfaces as an error and must leave the caller's lifecycle state
/// untouched.
#[async_trait]
pub trait SpamChecker: Send + Sync {
    /// Checker name (e.g., "http")
    fn name(&self) -> &str;

    /// Submit one comment for a spam verdict
    async fn check(&self, request: &SpamCheckRequest) -> anyhow::Result<SpamVerdict>;
}

/// HTTP implementation of the spam-detection seam
///
/// Posts the request as JSON with an API key header and decodes the
/// verdict. Transient network failures are retried with backoff before
/// surfacing to the lifecycle.
pub struct HttpSpamChecker {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
    timeout: Duration,
    retry: RetryManager,
}

impl HttpSpamChecker {
    /// Create a new checker for the given endpoint
    ///
    /// # Arguments
    ///
    /// * `api_url` - Spam-detection API endpoint
    /// * `api_key` - API key sent in the X-Api-Key header
    pub fn new(api_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryManager::new(RetryOptions::default()),
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the transient-failure retry behavior
    pub fn with_retry(mut self, options: RetryOptions) -> Self {
        self.retry = RetryManager::new(options);
        self
    }

    /// Build a checker from the spam section of the configuration
    pub fn from_config(config: &SpamConfig) -> Self {
        let api_key = SecretString::new(config.api_key.expose_secret().into());
        let mut checker = Self::new(config.api_url.clone(), api_key);
        if let Some(secs) = config.timeout_secs {
            checker = checker.with_timeout(Duration::from_secs(secs));
        }
        checker
    }

    /// Endpoint this checker posts to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl SpamChecker for HttpSpamChecker {
    fn name(&self) -> &str {
        "http"
    }

    async fn check(&self, request: &SpamCheckRequest) -> anyhow::Result<SpamVerdict> {
        self.retry
            .retry(|| {
                let client = self.client.clone();
                let url = self.api_url.clone();
                let api_key = self.api_key.expose_secret().to_string();
                let timeout = self.timeout;
                let payload = request.clone();

                async move {
                    let response = client
                        .post(&url)
                        .timeout(timeout)
                        .header("X-Api-Key", api_key.as_str())
                        .json(&payload)
                        .send()
                        .await?
                        .error_for_status()?;

                    Ok::<_, anyhow::Error>(response.json::<SpamVerdict>().await?)
                }
            })
            .await
    }
}
