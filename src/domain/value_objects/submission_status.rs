use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    New,
    Reopened,
    Draft,
    Submitted,
    Unknown(String),
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SubmissionStatus::New => "new",
            SubmissionStatus::Reopened => "reopened",
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Unknown(value) => value.as_str(),
        }
    }

    /// Whether the attempt still accepts edits from the owner.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::New | SubmissionStatus::Reopened | SubmissionStatus::Draft
        )
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for SubmissionStatus {
    fn from(value: &str) -> Self {
        match value {
            "new" => SubmissionStatus::New,
            "reopened" => SubmissionStatus::Reopened,
            "draft" => SubmissionStatus::Draft,
            "submitted" => SubmissionStatus::Submitted,
            other => SubmissionStatus::Unknown(other.to_string()),
        }
    }
}
