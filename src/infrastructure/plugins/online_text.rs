use crate::application::ports::offline_queue::PluginDraftStore;
use crate::application::ports::payload_plugin::PayloadPlugin;
use crate::domain::entities::offline::PluginDraft;
use crate::domain::entities::{Assignment, PluginDataMap, PluginPayload, PluginSubtype};
use crate::domain::value_objects::{AssignmentId, PluginType, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

const EDITOR_KEY: &str = "onlinetext_editor";

/// Online text submissions. Content typed into the editor is kept as an
/// offline draft while editing, validated against the configured word limit
/// on submit, and refused for offline editing once the stored text embeds
/// server-side file references.
pub struct OnlineTextPlugin {
    plugin_type: PluginType,
    drafts: Arc<dyn PluginDraftStore>,
}

impl OnlineTextPlugin {
    pub fn new(drafts: Arc<dyn PluginDraftStore>) -> Self {
        Self {
            plugin_type: PluginType::from_static("onlinetext"),
            drafts,
        }
    }

    fn word_limit(&self, assignment: &Assignment) -> Option<u64> {
        let config = assignment.plugin_config(PluginSubtype::Submission, &self.plugin_type)?;
        if setting_as_i64(&config.settings, "wordlimitenabled")? != 1 {
            return None;
        }
        setting_as_i64(&config.settings, "wordlimit").map(|limit| limit.max(0) as u64)
    }
}

#[async_trait]
impl PayloadPlugin for OnlineTextPlugin {
    fn plugin_type(&self) -> &PluginType {
        &self.plugin_type
    }

    fn is_empty(&self, payload: &PluginPayload) -> bool {
        text_of(&payload.content).trim().is_empty()
    }

    async fn has_changed(
        &self,
        assignment: &Assignment,
        payload: Option<&PluginPayload>,
        input: &PluginDataMap,
        user_id: UserId,
    ) -> Result<bool, AppError> {
        let entered = input
            .get(EDITOR_KEY)
            .map(|value| text_of(value))
            .unwrap_or_default();

        // ドラフトがあればそちらを基準にする。無ければサーバ側の本文。
        let baseline = match self
            .drafts
            .get_draft(assignment.id, user_id, &self.plugin_type)
            .await?
        {
            Some(draft) => text_of(&draft.content),
            None => payload
                .map(|payload| text_of(&payload.content))
                .unwrap_or_default(),
        };

        Ok(entered != baseline)
    }

    fn size_estimate(
        &self,
        payload: Option<&PluginPayload>,
        input: Option<&PluginDataMap>,
    ) -> u64 {
        let from_input = input
            .and_then(|input| input.get(EDITOR_KEY))
            .map(|value| text_of(value).len() as u64);

        from_input.unwrap_or_else(|| {
            payload
                .map(|payload| text_of(&payload.content).len() as u64)
                .unwrap_or(0)
        })
    }

    async fn prepare_for_submit(
        &self,
        assignment: &Assignment,
        input: &PluginDataMap,
        out: &mut PluginDataMap,
        offline: bool,
        user_id: UserId,
    ) -> Result<(), AppError> {
        let Some(editor) = input.get(EDITOR_KEY) else {
            return Ok(());
        };

        let text = text_of(editor);
        if let Some(limit) = self.word_limit(assignment) {
            let words = count_words(&text) as u64;
            if words > limit {
                return Err(AppError::ValidationError(format!(
                    "word limit exceeded: {words} words where {limit} are allowed"
                )));
            }
        }

        if offline {
            self.drafts
                .save_draft(PluginDraft {
                    assignment_id: assignment.id,
                    user_id,
                    plugin_type: self.plugin_type.as_str().to_string(),
                    content: json!({ "text": text }),
                    modified_at: Utc::now(),
                })
                .await?;
        }

        out.insert(EDITOR_KEY.to_string(), editor.clone());
        Ok(())
    }

    async fn prepare_for_sync(
        &self,
        _assignment: &Assignment,
        queued: &PluginDataMap,
        out: &mut PluginDataMap,
    ) -> Result<(), AppError> {
        if let Some(editor) = queued.get(EDITOR_KEY) {
            out.insert(EDITOR_KEY.to_string(), editor.clone());
        }
        Ok(())
    }

    fn can_edit_offline(&self, _assignment: &Assignment, payload: &PluginPayload) -> bool {
        // Embedded file references are rewritten by server-side filters;
        // editing them offline would desync the stored text.
        !text_of(&payload.content).contains("@@PLUGINFILE@@")
    }

    async fn remove_offline_data(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        self.drafts
            .delete_draft(assignment_id, user_id, &self.plugin_type)
            .await
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => map
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn setting_as_i64(settings: &Value, key: &str) -> Option<i64> {
    match settings.get(key)? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}
