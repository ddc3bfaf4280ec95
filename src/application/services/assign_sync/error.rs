use crate::application::ports::assign_api::ApiFailure;
use crate::domain::value_objects::AssignmentId;
use crate::shared::error::AppError;
use thiserror::Error;

/// Decision taxonomy for one sync operation. The orchestrator pattern-matches
/// on this to choose between retrying later, discarding, and surfacing a
/// distinct "blocked" outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error("device is offline")]
    Offline,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("rejected by the site: {message} ({code})")]
    Rejected { code: String, message: String },

    #[error("sync blocked for assignment {0}")]
    Blocked(AssignmentId),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl SyncError {
    /// Transient failures leave every queued record untouched; the next
    /// scheduled or manual run retries them.
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncError::Offline | SyncError::Transport(_))
    }
}

impl From<ApiFailure> for SyncError {
    fn from(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::Transport(message) => SyncError::Transport(message),
            ApiFailure::Service { code, message } => SyncError::Rejected { code, message },
        }
    }
}

impl From<AppError> for SyncError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::ValidationError(message) => SyncError::Validation(message),
            other => SyncError::Storage(other.to_string()),
        }
    }
}
