use crate::domain::value_objects::{PluginType, SubmissionStatus, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing web-service parameter map, merged plugin by plugin.
pub type PluginDataMap = serde_json::Map<String, Value>;

/// Opaque per-plugin content attached to a submission or feedback object.
/// Only the owning plugin implementation may interpret or diff it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginPayload {
    pub plugin_type: PluginType,
    pub content: Value,
}

impl PluginPayload {
    pub fn new(plugin_type: PluginType, content: Value) -> Self {
        Self {
            plugin_type,
            content,
        }
    }
}

/// Server-authoritative submission attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: i64,
    pub user_id: UserId,
    pub attempt_number: i64,
    pub status: SubmissionStatus,
    pub group_id: Option<i64>,
    pub time_modified: i64,
    pub plugins: Vec<PluginPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub grade: Option<f64>,
    /// Server timestamp of the last online grading action.
    pub graded_at: Option<i64>,
    pub grader_id: Option<UserId>,
    pub plugins: Vec<PluginPayload>,
}

/// Authoritative per-user view returned by the site for one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionStatusSnapshot {
    pub submission: Option<SubmissionRecord>,
    pub feedback: Option<FeedbackRecord>,
}

impl SubmissionStatusSnapshot {
    /// Last-modified time of the current submission, 0 when none exists yet.
    pub fn submission_time_modified(&self) -> i64 {
        self.submission
            .as_ref()
            .map(|submission| submission.time_modified)
            .unwrap_or(0)
    }
}

/// One canonical gradebook entry for a (course module, user) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeItem {
    pub outcome_id: Option<i64>,
    pub grade: Option<f64>,
    pub graded_at: Option<i64>,
}
