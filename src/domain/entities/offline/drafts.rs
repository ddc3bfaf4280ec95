use crate::domain::entities::submission::PluginDataMap;
use crate::domain::value_objects::{AssignmentId, CourseId, UserId, WorkflowState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// オフライン提出を保存する際に使用するドラフト。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub assignment_id: AssignmentId,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub plugin_data: PluginDataMap,
    pub online_time_modified: i64,
    pub submitted: bool,
}

impl SubmissionDraft {
    pub fn new(
        assignment_id: AssignmentId,
        course_id: CourseId,
        user_id: UserId,
        plugin_data: PluginDataMap,
        online_time_modified: i64,
        submitted: bool,
    ) -> Self {
        Self {
            assignment_id,
            course_id,
            user_id,
            plugin_data,
            online_time_modified,
            submitted,
        }
    }
}

/// オフライン採点を保存する際に使用するドラフト。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeDraft {
    pub assignment_id: AssignmentId,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub grade: Option<f64>,
    pub attempt_number: i64,
    pub add_attempt: bool,
    pub workflow_state: Option<WorkflowState>,
    pub apply_to_all: bool,
    pub outcomes: BTreeMap<i64, f64>,
    pub plugin_data: PluginDataMap,
}

impl GradeDraft {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        assignment_id: AssignmentId,
        course_id: CourseId,
        user_id: UserId,
        grade: Option<f64>,
        attempt_number: i64,
        add_attempt: bool,
        workflow_state: Option<WorkflowState>,
        apply_to_all: bool,
        outcomes: BTreeMap<i64, f64>,
        plugin_data: PluginDataMap,
    ) -> Self {
        Self {
            assignment_id,
            course_id,
            user_id,
            grade,
            attempt_number,
            add_attempt,
            workflow_state,
            apply_to_all,
            outcomes,
            plugin_data,
        }
    }
}
