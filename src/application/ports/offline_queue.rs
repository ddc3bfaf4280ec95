use crate::domain::entities::offline::{
    GradeDraft, OfflineGradeRecord, OfflineSubmissionRecord, PluginDraft, SubmissionDraft,
    SyncTimeRecord,
};
use crate::domain::value_objects::{AssignmentId, PluginType, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable per-(assignment, user) queue of not-yet-acknowledged coursework
/// edits. Implementations report facts only; deciding discard vs. retry is
/// the orchestrator's job.
#[async_trait]
pub trait OfflineQueue: Send + Sync {
    /// Upsert; unconditionally overwrites any queued record for the key.
    async fn save_submission(&self, draft: SubmissionDraft) -> Result<(), AppError>;

    /// Upsert, same overwrite semantics as [`save_submission`](Self::save_submission).
    async fn save_grade(&self, draft: GradeDraft) -> Result<(), AppError>;

    /// Fails with [`AppError::NotFound`] when nothing is queued for the key.
    async fn get_submission(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<OfflineSubmissionRecord, AppError>;

    async fn get_grade(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<OfflineGradeRecord, AppError>;

    /// Idempotent; absent records are a no-op.
    async fn delete_submission(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), AppError>;

    async fn delete_grade(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), AppError>;

    /// All users' queued submissions for one assignment.
    async fn submissions_for_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<OfflineSubmissionRecord>, AppError>;

    async fn grades_for_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<OfflineGradeRecord>, AppError>;

    /// De-duplicated assignment ids with at least one queued record of either
    /// kind, across all users.
    async fn list_assignments_with_pending_data(&self) -> Result<Vec<AssignmentId>, AppError>;

    async fn has_pending_data(&self, assignment_id: AssignmentId) -> Result<bool, AppError>;

    async fn record_sync_time(
        &self,
        assignment_id: AssignmentId,
        record: SyncTimeRecord,
    ) -> Result<(), AppError>;

    async fn last_sync(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Option<SyncTimeRecord>, AppError>;
}

/// Plugin-level offline draft storage, separate from the record queue so a
/// plugin can persist work-in-progress content while the user is still
/// editing.
#[async_trait]
pub trait PluginDraftStore: Send + Sync {
    async fn save_draft(&self, draft: PluginDraft) -> Result<(), AppError>;

    async fn get_draft(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
        plugin_type: &PluginType,
    ) -> Result<Option<PluginDraft>, AppError>;

    async fn delete_draft(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
        plugin_type: &PluginType,
    ) -> Result<(), AppError>;

    /// Clears every plugin's draft for the (assignment, user) pair.
    async fn delete_drafts(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), AppError>;
}
