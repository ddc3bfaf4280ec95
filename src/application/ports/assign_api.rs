use crate::domain::entities::offline::OfflineGradeRecord;
use crate::domain::entities::{Assignment, GradeItem, PluginDataMap, SubmissionStatusSnapshot};
use crate::domain::value_objects::{AssignmentId, CourseId, UserId};
use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of the remote site API. Transport failures are retryable;
/// service failures are authoritative rejections and must not be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("{message} ({code})")]
    Service { code: String, message: String },
}

impl ApiFailure {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiFailure::Transport(_))
    }
}

/// サイト側 Web サービスへの型付きゲートウェイ。トランスポート・認証・
/// キャッシュの詳細は実装側に委ねる。
#[async_trait]
pub trait AssignApi: Send + Sync {
    /// Fresh assignment snapshot, bypassing any response cache.
    async fn assignment(&self, assignment_id: AssignmentId) -> Result<Assignment, ApiFailure>;

    /// Authoritative submission + feedback state for one user.
    async fn submission_status(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<SubmissionStatusSnapshot, ApiFailure>;

    /// Push prepared submission plugin data.
    async fn save_submission(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
        plugin_data: &PluginDataMap,
    ) -> Result<(), ApiFailure>;

    /// Flip a draft into "submitted for grading".
    async fn submit_for_grading(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), ApiFailure>;

    /// Push a grading action together with prepared feedback plugin data.
    async fn save_grade(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
        grade: &OfflineGradeRecord,
        plugin_data: &PluginDataMap,
    ) -> Result<(), ApiFailure>;

    /// Canonical gradebook entries for one user on one course module.
    async fn grade_items(
        &self,
        course_id: CourseId,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<Vec<GradeItem>, ApiFailure>;
}
