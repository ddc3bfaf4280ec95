pub mod ids;
pub mod plugin_type;
pub mod submission_status;
pub mod workflow_state;

pub use ids::{AssignmentId, CourseId, UserId};
pub use plugin_type::PluginType;
pub use submission_status::SubmissionStatus;
pub use workflow_state::WorkflowState;
