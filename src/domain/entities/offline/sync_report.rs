use crate::domain::value_objects::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What started a sync run. Carried into emitted events so the UI can tell
/// user-requested syncs apart from scheduled ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncTrigger {
    Manual,
    Automatic,
}

impl SyncTrigger {
    pub fn as_str(&self) -> &str {
        match self {
            SyncTrigger::Manual => "manual",
            SyncTrigger::Automatic => "automatic",
        }
    }
}

/// Outcome of one orchestrator run over a single assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Human-readable warnings, one per discarded record.
    pub warnings: Vec<String>,
    /// True when any record was pushed or discarded — either way the queue
    /// changed and cached server reads must be refreshed.
    pub updated: bool,
    /// Users whose queued grade could not be applied because their grading
    /// view is open elsewhere. Still queued, not lost.
    pub grades_blocked: Vec<UserId>,
}

impl SyncReport {
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Completion bookkeeping read by the periodic "sync if needed" check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncTimeRecord {
    pub synced_at: DateTime<Utc>,
    pub warnings: Vec<String>,
}
