//! Per-comment spam check state
//!
//! This module provides the state carried by every comment through the
//! check/recheck lifecycle. The state is created alongside the comment,
//! mutated only by the lifecycle operations, and stored by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Spam verdict status of a comment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpamStatus {
    Pending,
    Clean,
    Spam,
}

/// Spam check state data for a single comment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpamCheckState {
    /// Current status
    pub status: SpamStatus,

    /// Completed automatic rechecks
    #[serde(rename = "recheckCount")]
    pub recheck_count: u32,

    /// Timestamp of the last completed check
    #[serde(rename = "checkedAt", skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
}

impl Default for SpamCheckState {
    fn default() -> Self {
        Self::new()
    }
}

impl SpamCheckState {
    /// Create the initial state for a freshly posted comment
    pub fn new() -> Self {
        Self {
            status: SpamStatus::Pending,
            recheck_count: 0,
            checked_at: None,
        }
    }

    /// Check if an initial (non-recheck) pass already completed
    pub fn has_been_checked(&self) -> bool {
        self.checked_at.is_some()
    }

    /// Check if another automatic recheck is allowed
    pub fn can_recheck(&self, max_attempts: u32) -> bool {
        self.recheck_count < max_attempts
    }

    /// Apply a manual moderator override
    ///
    /// Clean and Spam transition freely into each other here. The recheck
    /// counter and last-checked timestamp are left untouched; an override
    /// is a judgment call, not a completed check.
    pub fn override_status(&mut self, status: SpamStatus) {
        self.status = status;
    }
}
