use crate::domain::entities::submission::PluginDataMap;
use crate::domain::value_objects::{AssignmentId, CourseId, UserId, WorkflowState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A locally queued submission edit, waiting for the next sync run.
/// At most one record exists per (assignment, user); saves overwrite in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineSubmissionRecord {
    pub assignment_id: AssignmentId,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub plugin_data: PluginDataMap,
    /// Server `time_modified` the edit was based on — the conflict baseline.
    pub online_time_modified: i64,
    /// Whether the student also asked to submit for grading.
    pub submitted: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// A locally queued grading action. Same one-record-per-(assignment, user)
/// invariant as submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineGradeRecord {
    pub assignment_id: AssignmentId,
    pub course_id: CourseId,
    /// The student being graded, not the grader.
    pub user_id: UserId,
    pub grade: Option<f64>,
    pub attempt_number: i64,
    pub add_attempt: bool,
    pub workflow_state: Option<WorkflowState>,
    pub apply_to_all: bool,
    /// Outcome id to value, as shown in the grading form.
    pub outcomes: BTreeMap<i64, f64>,
    pub plugin_data: PluginDataMap,
    pub modified_at: DateTime<Utc>,
}

impl OfflineGradeRecord {
    /// The queued shape of a grading action; also used as the wire parameter
    /// when pushing a grade straight from the form.
    pub fn from_draft(draft: super::drafts::GradeDraft, modified_at: DateTime<Utc>) -> Self {
        Self {
            assignment_id: draft.assignment_id,
            course_id: draft.course_id,
            user_id: draft.user_id,
            grade: draft.grade,
            attempt_number: draft.attempt_number,
            add_attempt: draft.add_attempt,
            workflow_state: draft.workflow_state,
            apply_to_all: draft.apply_to_all,
            outcomes: draft.outcomes,
            plugin_data: draft.plugin_data,
            modified_at,
        }
    }
}

/// One plugin's offline draft content, keyed (assignment, user, plugin type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDraft {
    pub assignment_id: AssignmentId,
    pub user_id: UserId,
    pub plugin_type: String,
    pub content: serde_json::Value,
    pub modified_at: DateTime<Utc>,
}
