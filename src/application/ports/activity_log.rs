use crate::application::ports::assign_api::ApiFailure;
use crate::domain::value_objects::AssignmentId;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Queued view/interaction log entries for an activity, flushed alongside the
/// coursework queue. Owned by the course-log subsystem; consumed here so a
/// sync run can report "nothing pending" accurately.
#[async_trait]
pub trait ActivityLogQueue: Send + Sync {
    async fn has_pending(&self, assignment_id: AssignmentId) -> Result<bool, AppError>;

    async fn flush(&self, assignment_id: AssignmentId) -> Result<(), ApiFailure>;
}
