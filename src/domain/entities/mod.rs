pub mod assignment;
pub mod offline;
pub mod submission;

pub use assignment::{Assignment, AttemptReopenMethod, PluginConfig, PluginSubtype};
pub use submission::{
    FeedbackRecord, GradeItem, PluginDataMap, PluginPayload, SubmissionRecord,
    SubmissionStatusSnapshot,
};
