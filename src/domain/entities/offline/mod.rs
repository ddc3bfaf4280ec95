pub mod drafts;
pub mod records;
pub mod sync_report;

pub use drafts::{GradeDraft, SubmissionDraft};
pub use records::{OfflineGradeRecord, OfflineSubmissionRecord, PluginDraft};
pub use sync_report::{SyncReport, SyncTimeRecord, SyncTrigger};
