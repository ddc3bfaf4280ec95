use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OfflineSubmissionRow {
    pub assignment_id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub plugin_data: String,
    pub online_time_modified: i64,
    pub submitted: bool,
    pub created_at: i64,
    pub modified_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OfflineGradeRow {
    pub assignment_id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub grade: Option<f64>,
    pub attempt_number: i64,
    pub add_attempt: bool,
    pub workflow_state: Option<String>,
    pub apply_to_all: bool,
    pub outcomes: String,
    pub plugin_data: String,
    pub modified_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PluginDraftRow {
    pub assignment_id: i64,
    pub user_id: i64,
    pub plugin_type: String,
    pub content: String,
    pub modified_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncTimeRow {
    pub assignment_id: i64,
    pub synced_at: i64,
    pub warnings: Option<String>,
}
