//! Spam check lifecycle
//!
//! This module governs whether a comment may be (re)checked for spam, how
//! many automatic attempts remain, and when a delayed recheck is scheduled.
//! The external detection call and the delayed-task queue are collaborator
//! seams; the lifecycle owns only the state transitions.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::SpamConfig;
use crate::core::error::ForgeError;
use crate::moderation::checker::{SpamCheckRequest, SpamChecker};
use crate::moderation::state::{SpamCheckState, SpamStatus};

/// Default maximum number of automatic rechecks per comment
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Why a check request was skipped without touching state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Initial check requested but the comment was already checked
    AlreadyChecked,
    /// Recheck requested but the attempt budget is spent
    AttemptsExhausted,
}

/// Outcome of a check request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The external check completed and state was updated
    Checked {
        status: SpamStatus,
        /// Delay accepted for a follow-up recheck, forwarded to the
        /// scheduler when one is attached
        scheduled_recheck: Option<Duration>,
    },
    /// The request was a guarded no-op
    Skipped { reason: SkipReason },
}

/// Seam for scheduling a delayed recheck
///
/// Implementations enqueue a delayed task that will call
/// [`SpamCheckLifecycle::request_check`] again with `is_recheck = true`;
/// the attempt guard is re-evaluated when that task runs.
#[async_trait]
pub trait RecheckScheduler: Send + Sync {
    async fn schedule_recheck(&self, comment_id: u64, delay: Duration) -> anyhow::Result<()>;
}

/// State machine driving spam checks and bounded rechecks
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use secrecy::SecretString;
/// use forge_core::moderation::{
///     HttpSpamChecker, SpamCheckLifecycle, SpamCheckRequest, SpamCheckState,
/// };
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let checker = HttpSpamChecker::new(
///         "https://spam.example.com/check",
///         SecretString::new("key".into()),
///     );
///     let lifecycle = SpamCheckLifecycle::new(Arc::new(checker));
///
///     let mut state = SpamCheckState::new();
///     let request = SpamCheckRequest::new(42, "alice", "great mod!");
///     let outcome = lifecycle.request_check(&mut state, &request, false).await?;
///
///     println!("{:?}", outcome);
///     Ok(())
/// }
/// ```
pub struct SpamCheckLifecycle {
    checker: Arc<dyn SpamChecker>,
    scheduler: Option<Arc<dyn RecheckScheduler>>,
    max_attempts: u32,
}

impl SpamCheckLifecycle {
    /// Create a new lifecycle with the default attempt budget
    pub fn new(checker: Arc<dyn SpamChecker>) -> Self {
        Self {
            checker,
            scheduler: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Attach a scheduler for delayed rechecks
    pub fn with_scheduler(mut self, scheduler: Arc<dyn RecheckScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Override the maximum number of automatic rechecks
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Build a lifecycle from the spam section of the configuration
    pub fn from_config(config: &SpamConfig, checker: Arc<dyn SpamChecker>) -> Self {
        let mut lifecycle = Self::new(checker);
        if let Some(max_attempts) = config.max_rechecks {
            lifecycle.max_attempts = max_attempts;
        }
        lifecycle
    }

    /// Maximum number of automatic rechecks
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run a check or recheck for one comment
    ///
    /// An initial check on an already-checked comment and a recheck past
    /// the attempt budget are both no-ops that leave state untouched. A
    /// transient failure of the external call also leaves state fully
    /// unchanged and surfaces as a distinct "check failed, try again
    /// later" error, never as a verdict.
    pub async fn request_check(
        &self,
        state: &mut SpamCheckState,
        request: &SpamCheckRequest,
        is_recheck: bool,
    ) -> Result<CheckOutcome, ForgeError> {
        if !is_recheck && state.has_been_checked() {
            return Ok(CheckOutcome::Skipped {
                reason: SkipReason::AlreadyChecked,
            });
        }
        if is_recheck && !state.can_recheck(self.max_attempts) {
            return Ok(CheckOutcome::Skipped {
                reason: SkipReason::AttemptsExhausted,
            });
        }

        let verdict = match self.checker.check(request).await {
            Ok(verdict) => verdict,
            Err(error) => {
                tracing::warn!(
                    comment_id = request.comment_id,
                    checker = self.checker.name(),
                    error = %error,
                    "spam check failed, state left unchanged"
                );
                return Err(Self::classify_failure(&error));
            }
        };

        state.status = if verdict.spam {
            SpamStatus::Spam
        } else {
            SpamStatus::Clean
        };
        state.checked_at = Some(Utc::now());
        if is_recheck {
            state.recheck_count += 1;
        }

        let scheduled_recheck = match verdict.recheck_after {
            Some(seconds) if state.can_recheck(self.max_attempts) => {
                let delay = Duration::from_secs(seconds);
                if let Some(scheduler) = &self.scheduler {
                    if let Err(error) =
                        scheduler.schedule_recheck(request.comment_id, delay).await
                    {
                        tracing::warn!(
                            comment_id = request.comment_id,
                            error = %error,
                            "failed to schedule recheck"
                        );
                    }
                }
                Some(delay)
            }
            Some(_) => {
                tracing::debug!(
                    comment_id = request.comment_id,
                    recheck_count = state.recheck_count,
                    "recheck hint ignored, attempt budget spent"
                );
                None
            }
            None => None,
        };

        Ok(CheckOutcome::Checked {
            status: state.status,
            scheduled_recheck,
        })
    }

    /// Map a checker failure to the lifecycle error taxonomy
    fn classify_failure(error: &anyhow::Error) -> ForgeError {
        for cause in error.chain() {
            if let Some(request_error) = cause.downcast_ref::<reqwest::Error>() {
                if request_error.is_timeout() {
                    return ForgeError::SpamCheckTimeout;
                }
            }
        }
        ForgeError::SpamCheckUnavailable {
            message: error.to_string(),
        }
    }
}
