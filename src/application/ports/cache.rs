use crate::domain::value_objects::AssignmentId;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Drops cached server reads for an assignment after a sync changed its
/// state, forcing the next view to refetch.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, assignment_id: AssignmentId) -> Result<(), AppError>;
}
