use crate::domain::entities::offline::{
    OfflineGradeRecord, OfflineSubmissionRecord, PluginDraft, SyncTimeRecord,
};
use crate::domain::entities::PluginDataMap;
use crate::domain::value_objects::{AssignmentId, CourseId, UserId, WorkflowState};
use crate::infrastructure::offline::rows::{
    OfflineGradeRow, OfflineSubmissionRow, PluginDraftRow, SyncTimeRow,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

pub fn submission_from_row(row: OfflineSubmissionRow) -> Result<OfflineSubmissionRecord, AppError> {
    Ok(OfflineSubmissionRecord {
        assignment_id: AssignmentId::new(row.assignment_id).map_err(AppError::ValidationError)?,
        course_id: CourseId::new(row.course_id).map_err(AppError::ValidationError)?,
        user_id: UserId::new(row.user_id).map_err(AppError::ValidationError)?,
        plugin_data: plugin_map_from_json(&row.plugin_data)?,
        online_time_modified: row.online_time_modified,
        submitted: row.submitted,
        created_at: timestamp_to_datetime(row.created_at),
        modified_at: timestamp_to_datetime(row.modified_at),
    })
}

pub fn grade_from_row(row: OfflineGradeRow) -> Result<OfflineGradeRecord, AppError> {
    Ok(OfflineGradeRecord {
        assignment_id: AssignmentId::new(row.assignment_id).map_err(AppError::ValidationError)?,
        course_id: CourseId::new(row.course_id).map_err(AppError::ValidationError)?,
        user_id: UserId::new(row.user_id).map_err(AppError::ValidationError)?,
        grade: row.grade,
        attempt_number: row.attempt_number,
        add_attempt: row.add_attempt,
        workflow_state: row.workflow_state.as_deref().map(WorkflowState::from),
        apply_to_all: row.apply_to_all,
        outcomes: outcomes_from_json(&row.outcomes)?,
        plugin_data: plugin_map_from_json(&row.plugin_data)?,
        modified_at: timestamp_to_datetime(row.modified_at),
    })
}

pub fn draft_from_row(row: PluginDraftRow) -> Result<PluginDraft, AppError> {
    Ok(PluginDraft {
        assignment_id: AssignmentId::new(row.assignment_id).map_err(AppError::ValidationError)?,
        user_id: UserId::new(row.user_id).map_err(AppError::ValidationError)?,
        plugin_type: row.plugin_type,
        content: serde_json::from_str(&row.content)
            .map_err(|err| AppError::DeserializationError(err.to_string()))?,
        modified_at: timestamp_to_datetime(row.modified_at),
    })
}

pub fn sync_time_from_row(row: SyncTimeRow) -> SyncTimeRecord {
    let warnings = row
        .warnings
        .as_deref()
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or_default();

    SyncTimeRecord {
        synced_at: timestamp_to_datetime(row.synced_at),
        warnings,
    }
}

pub fn plugin_map_to_json(map: &PluginDataMap) -> Result<String, AppError> {
    serde_json::to_string(map).map_err(|err| AppError::SerializationError(err.to_string()))
}

pub fn outcomes_to_json(outcomes: &BTreeMap<i64, f64>) -> Result<String, AppError> {
    let by_key: BTreeMap<String, f64> = outcomes
        .iter()
        .map(|(id, value)| (id.to_string(), *value))
        .collect();
    serde_json::to_string(&by_key).map_err(|err| AppError::SerializationError(err.to_string()))
}

fn plugin_map_from_json(json: &str) -> Result<PluginDataMap, AppError> {
    match serde_json::from_str::<Value>(json)
        .map_err(|err| AppError::DeserializationError(err.to_string()))?
    {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::DeserializationError(
            "plugin data must be a JSON object".to_string(),
        )),
    }
}

fn outcomes_from_json(json: &str) -> Result<BTreeMap<i64, f64>, AppError> {
    let by_key: BTreeMap<String, f64> = serde_json::from_str(json)
        .map_err(|err| AppError::DeserializationError(err.to_string()))?;

    by_key
        .into_iter()
        .map(|(id, value)| {
            id.parse::<i64>()
                .map(|id| (id, value))
                .map_err(|_| AppError::DeserializationError(format!("bad outcome id: {id}")))
        })
        .collect()
}

pub fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}
