use crate::application::ports::payload_plugin::PayloadPlugin;
use crate::domain::entities::offline::{OfflineGradeRecord, OfflineSubmissionRecord};
use crate::domain::entities::{
    Assignment, FeedbackRecord, PluginDataMap, PluginPayload, PluginSubtype, SubmissionRecord,
};
use crate::domain::value_objects::{AssignmentId, PluginType, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Resolves plugin-type tags to protocol implementations and fans calls out
/// over every plugin attached to a submission or feedback object. Built
/// explicitly at startup and injected; tests register fakes the same way.
pub struct PluginRegistry {
    submission: HashMap<String, Arc<dyn PayloadPlugin>>,
    feedback: HashMap<String, Arc<dyn PayloadPlugin>>,
    fallback: Arc<dyn PayloadPlugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            submission: HashMap::new(),
            feedback: HashMap::new(),
            fallback: Arc::new(NoopPlugin::new()),
        }
    }

    pub fn register_submission(&mut self, plugin: Arc<dyn PayloadPlugin>) {
        self.submission
            .insert(plugin.plugin_type().as_str().to_string(), plugin);
    }

    pub fn register_feedback(&mut self, plugin: Arc<dyn PayloadPlugin>) {
        self.feedback
            .insert(plugin.plugin_type().as_str().to_string(), plugin);
    }

    pub fn submission_plugin(&self, plugin_type: &PluginType) -> Arc<dyn PayloadPlugin> {
        self.resolve(&self.submission, plugin_type)
    }

    pub fn feedback_plugin(&self, plugin_type: &PluginType) -> Arc<dyn PayloadPlugin> {
        self.resolve(&self.feedback, plugin_type)
    }

    fn resolve(
        &self,
        namespace: &HashMap<String, Arc<dyn PayloadPlugin>>,
        plugin_type: &PluginType,
    ) -> Arc<dyn PayloadPlugin> {
        match namespace.get(plugin_type.as_str()) {
            Some(plugin) => Arc::clone(plugin),
            None => {
                debug!(
                    target: "assign::plugins",
                    plugin_type = %plugin_type,
                    "no handler registered, using no-op fallback"
                );
                Arc::clone(&self.fallback)
            }
        }
    }

    /// Builds the outgoing payload from live form input. A validation error
    /// from any plugin aborts the whole prepare — no partial submission.
    pub async fn prepare_submission(
        &self,
        assignment: &Assignment,
        submission: Option<&SubmissionRecord>,
        input: &PluginDataMap,
        offline: bool,
        user_id: UserId,
    ) -> Result<PluginDataMap, AppError> {
        let mut out = PluginDataMap::new();

        let plugin_types: Vec<PluginType> = match submission {
            Some(submission) => submission
                .plugins
                .iter()
                .map(|payload| payload.plugin_type.clone())
                .collect(),
            None => assignment
                .enabled_submission_plugins()
                .map(|config| config.plugin_type.clone())
                .collect(),
        };

        for plugin_type in &plugin_types {
            self.submission_plugin(plugin_type)
                .prepare_for_submit(assignment, input, &mut out, offline, user_id)
                .await?;
        }
        Ok(out)
    }

    /// Live-input variant for feedback plugins, driven by the assignment's
    /// enabled feedback configurations.
    pub async fn prepare_feedback(
        &self,
        assignment: &Assignment,
        input: &PluginDataMap,
        offline: bool,
        user_id: UserId,
    ) -> Result<PluginDataMap, AppError> {
        let mut out = PluginDataMap::new();
        let configs = assignment
            .plugin_configs
            .iter()
            .filter(|config| config.subtype == PluginSubtype::Feedback && config.enabled);

        for config in configs {
            self.feedback_plugin(&config.plugin_type)
                .prepare_for_submit(assignment, input, &mut out, offline, user_id)
                .await?;
        }
        Ok(out)
    }

    /// Builds the outgoing payload from a queued offline record.
    /// Orchestrator-only. A first-ever attempt has no server submission yet;
    /// the assignment's enabled submission plugin configurations drive the
    /// fan-out in that case.
    pub async fn prepare_submission_sync(
        &self,
        assignment: &Assignment,
        submission: Option<&SubmissionRecord>,
        record: &OfflineSubmissionRecord,
    ) -> Result<PluginDataMap, AppError> {
        let mut out = PluginDataMap::new();

        let plugin_types: Vec<PluginType> = match submission {
            Some(submission) => submission
                .plugins
                .iter()
                .map(|payload| payload.plugin_type.clone())
                .collect(),
            None => assignment
                .enabled_submission_plugins()
                .map(|config| config.plugin_type.clone())
                .collect(),
        };

        for plugin_type in &plugin_types {
            self.submission_plugin(plugin_type)
                .prepare_for_sync(assignment, &record.plugin_data, &mut out)
                .await?;
        }
        Ok(out)
    }

    /// Same for a queued grading action. When the user was never graded
    /// online there is no feedback object yet; the assignment's enabled
    /// feedback plugin configurations drive the fan-out instead.
    pub async fn prepare_feedback_sync(
        &self,
        assignment: &Assignment,
        feedback: Option<&FeedbackRecord>,
        record: &OfflineGradeRecord,
    ) -> Result<PluginDataMap, AppError> {
        let mut out = PluginDataMap::new();

        let plugin_types: Vec<PluginType> = match feedback {
            Some(feedback) => feedback
                .plugins
                .iter()
                .map(|payload| payload.plugin_type.clone())
                .collect(),
            None => assignment
                .plugin_configs
                .iter()
                .filter(|config| config.subtype == PluginSubtype::Feedback && config.enabled)
                .map(|config| config.plugin_type.clone())
                .collect(),
        };

        for plugin_type in &plugin_types {
            self.feedback_plugin(plugin_type)
                .prepare_for_sync(assignment, &record.plugin_data, &mut out)
                .await?;
        }
        Ok(out)
    }

    /// True when any plugin reports a difference between the live input and
    /// the server payload.
    pub async fn has_changed(
        &self,
        assignment: &Assignment,
        submission: &SubmissionRecord,
        input: &PluginDataMap,
        user_id: UserId,
    ) -> Result<bool, AppError> {
        for payload in &submission.plugins {
            let changed = self
                .submission_plugin(&payload.plugin_type)
                .has_changed(assignment, Some(payload), input, user_id)
                .await?;
            if changed {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True only when every plugin reports its payload empty.
    pub fn is_empty(&self, submission: &SubmissionRecord) -> bool {
        submission.plugins.iter().all(|payload| {
            self.submission_plugin(&payload.plugin_type)
                .is_empty(payload)
        })
    }

    /// A single plugin refusing offline editing makes the whole submission
    /// read-only while offline.
    pub fn can_edit_offline(&self, assignment: &Assignment, submission: &SubmissionRecord) -> bool {
        submission.plugins.iter().all(|payload| {
            self.submission_plugin(&payload.plugin_type)
                .can_edit_offline(assignment, payload)
        })
    }

    /// Summed upload size estimate across plugins, for confirmation prompts.
    pub fn size_estimate(
        &self,
        submission: &SubmissionRecord,
        input: Option<&PluginDataMap>,
    ) -> u64 {
        submission
            .plugins
            .iter()
            .map(|payload| {
                self.submission_plugin(&payload.plugin_type)
                    .size_estimate(Some(payload), input)
            })
            .sum()
    }

    /// Asks every registered submission plugin to drop its offline drafts for
    /// the pair. Plugins without drafts treat this as a no-op.
    pub async fn remove_submission_drafts(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        for plugin in self.submission.values() {
            plugin.remove_offline_data(assignment_id, user_id).await?;
        }
        Ok(())
    }

    pub async fn remove_feedback_drafts(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        for plugin in self.feedback.values() {
            plugin.remove_offline_data(assignment_id, user_id).await?;
        }
        Ok(())
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Inert implementation used for plugin types nothing is registered for.
/// Unknown content is carried along untouched rather than failing the whole
/// payload.
pub struct NoopPlugin {
    plugin_type: PluginType,
}

impl NoopPlugin {
    pub fn new() -> Self {
        Self {
            plugin_type: PluginType::from_static("unsupported"),
        }
    }
}

impl Default for NoopPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PayloadPlugin for NoopPlugin {
    fn plugin_type(&self) -> &PluginType {
        &self.plugin_type
    }

    fn is_empty(&self, _payload: &PluginPayload) -> bool {
        true
    }

    async fn has_changed(
        &self,
        _assignment: &Assignment,
        _payload: Option<&PluginPayload>,
        _input: &PluginDataMap,
        _user_id: UserId,
    ) -> Result<bool, AppError> {
        Ok(false)
    }

    fn size_estimate(
        &self,
        _payload: Option<&PluginPayload>,
        _input: Option<&PluginDataMap>,
    ) -> u64 {
        0
    }

    async fn prepare_for_submit(
        &self,
        _assignment: &Assignment,
        _input: &PluginDataMap,
        _out: &mut PluginDataMap,
        _offline: bool,
        _user_id: UserId,
    ) -> Result<(), AppError> {
        Ok(())
    }

    async fn prepare_for_sync(
        &self,
        _assignment: &Assignment,
        _queued: &PluginDataMap,
        _out: &mut PluginDataMap,
    ) -> Result<(), AppError> {
        Ok(())
    }

    fn can_edit_offline(&self, _assignment: &Assignment, _payload: &PluginPayload) -> bool {
        true
    }

    async fn remove_offline_data(
        &self,
        _assignment_id: AssignmentId,
        _user_id: UserId,
    ) -> Result<(), AppError> {
        Ok(())
    }
}
