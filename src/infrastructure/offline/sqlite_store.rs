use crate::application::ports::offline_queue::{OfflineQueue, PluginDraftStore};
use crate::domain::entities::offline::{
    GradeDraft, OfflineGradeRecord, OfflineSubmissionRecord, PluginDraft, SubmissionDraft,
    SyncTimeRecord,
};
use crate::domain::value_objects::{AssignmentId, PluginType, UserId};
use crate::infrastructure::offline::mappers;
use crate::infrastructure::offline::rows::{
    OfflineGradeRow, OfflineSubmissionRow, PluginDraftRow, SyncTimeRow,
};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Sqlite};

/// SQLite-backed offline queue. The sole writer that deletes records is the
/// sync orchestrator; UI saves always overwrite, so latest-local-edit-wins
/// is the worst a race can produce.
pub struct SqliteOfflineQueue {
    pool: Pool<Sqlite>,
}

impl SqliteOfflineQueue {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfflineQueue for SqliteOfflineQueue {
    async fn save_submission(&self, draft: SubmissionDraft) -> Result<(), AppError> {
        let plugin_data = mappers::plugin_map_to_json(&draft.plugin_data)?;
        let now = Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO offline_submissions (
                assignment_id, course_id, user_id, plugin_data,
                online_time_modified, submitted, created_at, modified_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ON CONFLICT(assignment_id, user_id) DO UPDATE SET
                course_id = excluded.course_id,
                plugin_data = excluded.plugin_data,
                online_time_modified = excluded.online_time_modified,
                submitted = excluded.submitted,
                modified_at = excluded.modified_at
            "#,
        )
        .bind(draft.assignment_id.as_i64())
        .bind(draft.course_id.as_i64())
        .bind(draft.user_id.as_i64())
        .bind(&plugin_data)
        .bind(draft.online_time_modified)
        .bind(draft.submitted)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_grade(&self, draft: GradeDraft) -> Result<(), AppError> {
        let plugin_data = mappers::plugin_map_to_json(&draft.plugin_data)?;
        let outcomes = mappers::outcomes_to_json(&draft.outcomes)?;
        let now = Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO offline_grades (
                assignment_id, course_id, user_id, grade, attempt_number,
                add_attempt, workflow_state, apply_to_all, outcomes,
                plugin_data, modified_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(assignment_id, user_id) DO UPDATE SET
                course_id = excluded.course_id,
                grade = excluded.grade,
                attempt_number = excluded.attempt_number,
                add_attempt = excluded.add_attempt,
                workflow_state = excluded.workflow_state,
                apply_to_all = excluded.apply_to_all,
                outcomes = excluded.outcomes,
                plugin_data = excluded.plugin_data,
                modified_at = excluded.modified_at
            "#,
        )
        .bind(draft.assignment_id.as_i64())
        .bind(draft.course_id.as_i64())
        .bind(draft.user_id.as_i64())
        .bind(draft.grade)
        .bind(draft.attempt_number)
        .bind(draft.add_attempt)
        .bind(draft.workflow_state.as_ref().map(|state| state.as_str().to_string()))
        .bind(draft.apply_to_all)
        .bind(&outcomes)
        .bind(&plugin_data)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_submission(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<OfflineSubmissionRecord, AppError> {
        let row = sqlx::query_as::<_, OfflineSubmissionRow>(
            r#"
            SELECT * FROM offline_submissions
            WHERE assignment_id = ?1 AND user_id = ?2
            "#,
        )
        .bind(assignment_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => mappers::submission_from_row(row),
            None => Err(AppError::NotFound(format!(
                "no offline submission queued for assignment {assignment_id}, user {user_id}"
            ))),
        }
    }

    async fn get_grade(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<OfflineGradeRecord, AppError> {
        let row = sqlx::query_as::<_, OfflineGradeRow>(
            r#"
            SELECT * FROM offline_grades
            WHERE assignment_id = ?1 AND user_id = ?2
            "#,
        )
        .bind(assignment_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => mappers::grade_from_row(row),
            None => Err(AppError::NotFound(format!(
                "no offline grade queued for assignment {assignment_id}, user {user_id}"
            ))),
        }
    }

    async fn delete_submission(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            DELETE FROM offline_submissions
            WHERE assignment_id = ?1 AND user_id = ?2
            "#,
        )
        .bind(assignment_id.as_i64())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_grade(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            DELETE FROM offline_grades
            WHERE assignment_id = ?1 AND user_id = ?2
            "#,
        )
        .bind(assignment_id.as_i64())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn submissions_for_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<OfflineSubmissionRecord>, AppError> {
        let rows = sqlx::query_as::<_, OfflineSubmissionRow>(
            r#"
            SELECT * FROM offline_submissions
            WHERE assignment_id = ?1
            ORDER BY created_at ASC
            "#,
        )
        .bind(assignment_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(mappers::submission_from_row).collect()
    }

    async fn grades_for_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<OfflineGradeRecord>, AppError> {
        let rows = sqlx::query_as::<_, OfflineGradeRow>(
            r#"
            SELECT * FROM offline_grades
            WHERE assignment_id = ?1
            ORDER BY modified_at ASC
            "#,
        )
        .bind(assignment_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(mappers::grade_from_row).collect()
    }

    async fn list_assignments_with_pending_data(&self) -> Result<Vec<AssignmentId>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT assignment_id FROM offline_submissions
            UNION
            SELECT assignment_id FROM offline_grades
            ORDER BY assignment_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        ids.into_iter()
            .map(|id| AssignmentId::new(id).map_err(AppError::ValidationError))
            .collect()
    }

    async fn has_pending_data(&self, assignment_id: AssignmentId) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT EXISTS(SELECT 1 FROM offline_submissions WHERE assignment_id = ?1)
                OR EXISTS(SELECT 1 FROM offline_grades WHERE assignment_id = ?1)
            "#,
        )
        .bind(assignment_id.as_i64())
        .fetch_one(&self.pool)
        .await?;

        Ok(found > 0)
    }

    async fn record_sync_time(
        &self,
        assignment_id: AssignmentId,
        record: SyncTimeRecord,
    ) -> Result<(), AppError> {
        let warnings = serde_json::to_string(&record.warnings)
            .map_err(|err| AppError::SerializationError(err.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO assign_sync_times (assignment_id, synced_at, warnings)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(assignment_id) DO UPDATE SET
                synced_at = excluded.synced_at,
                warnings = excluded.warnings
            "#,
        )
        .bind(assignment_id.as_i64())
        .bind(record.synced_at.timestamp())
        .bind(&warnings)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn last_sync(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Option<SyncTimeRecord>, AppError> {
        let row = sqlx::query_as::<_, SyncTimeRow>(
            r#"
            SELECT * FROM assign_sync_times
            WHERE assignment_id = ?1
            "#,
        )
        .bind(assignment_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(mappers::sync_time_from_row))
    }
}

#[async_trait]
impl PluginDraftStore for SqliteOfflineQueue {
    async fn save_draft(&self, draft: PluginDraft) -> Result<(), AppError> {
        let content = serde_json::to_string(&draft.content)
            .map_err(|err| AppError::SerializationError(err.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO plugin_drafts (
                assignment_id, user_id, plugin_type, content, modified_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(assignment_id, user_id, plugin_type) DO UPDATE SET
                content = excluded.content,
                modified_at = excluded.modified_at
            "#,
        )
        .bind(draft.assignment_id.as_i64())
        .bind(draft.user_id.as_i64())
        .bind(&draft.plugin_type)
        .bind(&content)
        .bind(draft.modified_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_draft(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
        plugin_type: &PluginType,
    ) -> Result<Option<PluginDraft>, AppError> {
        let row = sqlx::query_as::<_, PluginDraftRow>(
            r#"
            SELECT * FROM plugin_drafts
            WHERE assignment_id = ?1 AND user_id = ?2 AND plugin_type = ?3
            "#,
        )
        .bind(assignment_id.as_i64())
        .bind(user_id.as_i64())
        .bind(plugin_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(mappers::draft_from_row).transpose()
    }

    async fn delete_draft(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
        plugin_type: &PluginType,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            DELETE FROM plugin_drafts
            WHERE assignment_id = ?1 AND user_id = ?2 AND plugin_type = ?3
            "#,
        )
        .bind(assignment_id.as_i64())
        .bind(user_id.as_i64())
        .bind(plugin_type.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_drafts(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            DELETE FROM plugin_drafts
            WHERE assignment_id = ?1 AND user_id = ?2
            "#,
        )
        .bind(assignment_id.as_i64())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
