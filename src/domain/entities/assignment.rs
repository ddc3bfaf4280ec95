use crate::domain::value_objects::{AssignmentId, CourseId, PluginType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// プラグインが提出側・フィードバック側のどちらに属するか。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PluginSubtype {
    Submission,
    Feedback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub plugin_type: PluginType,
    pub subtype: PluginSubtype,
    pub enabled: bool,
    pub settings: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptReopenMethod {
    None,
    Manual,
    UntilPass,
}

/// Per-sync-run snapshot of an assignment. Always fetched fresh from the
/// server; never stored in the offline queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub course_id: CourseId,
    pub name: String,
    pub allow_submissions_from: Option<i64>,
    pub due_date: Option<i64>,
    pub cutoff_date: Option<i64>,
    pub plugin_configs: Vec<PluginConfig>,
    pub team_submission: bool,
    pub blind_marking: bool,
    /// When set, saving only produces a draft and the student has to submit
    /// for grading explicitly.
    pub submission_drafts: bool,
    pub marking_workflow: bool,
    /// -1 means unlimited attempts.
    pub max_attempts: i64,
    pub attempt_reopen_method: AttemptReopenMethod,
}

impl Assignment {
    pub fn plugin_config(
        &self,
        subtype: PluginSubtype,
        plugin_type: &PluginType,
    ) -> Option<&PluginConfig> {
        self.plugin_configs
            .iter()
            .find(|config| config.subtype == subtype && &config.plugin_type == plugin_type)
    }

    /// Enabled submission-side plugin configurations, in declaration order.
    pub fn enabled_submission_plugins(&self) -> impl Iterator<Item = &PluginConfig> {
        self.plugin_configs
            .iter()
            .filter(|config| config.subtype == PluginSubtype::Submission && config.enabled)
    }
}
