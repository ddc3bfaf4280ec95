use serde::{Deserialize, Serialize};
use std::fmt;

/// 採点ワークフローの段階。サーバ側の文字列をそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    NotMarked,
    InMarking,
    ReadyForReview,
    InReview,
    ReadyForRelease,
    Released,
    Unknown(String),
}

impl WorkflowState {
    pub fn as_str(&self) -> &str {
        match self {
            WorkflowState::NotMarked => "notmarked",
            WorkflowState::InMarking => "inmarking",
            WorkflowState::ReadyForReview => "readyforreview",
            WorkflowState::InReview => "inreview",
            WorkflowState::ReadyForRelease => "readyforrelease",
            WorkflowState::Released => "released",
            WorkflowState::Unknown(value) => value.as_str(),
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for WorkflowState {
    fn from(value: &str) -> Self {
        match value {
            "notmarked" => WorkflowState::NotMarked,
            "inmarking" => WorkflowState::InMarking,
            "readyforreview" => WorkflowState::ReadyForReview,
            "inreview" => WorkflowState::InReview,
            "readyforrelease" => WorkflowState::ReadyForRelease,
            "released" => WorkflowState::Released,
            other => WorkflowState::Unknown(other.to_string()),
        }
    }
}
