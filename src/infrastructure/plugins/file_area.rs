use crate::application::ports::payload_plugin::PayloadPlugin;
use crate::domain::entities::{Assignment, PluginDataMap, PluginPayload, PluginSubtype};
use crate::domain::value_objects::{AssignmentId, PluginType, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

const FILES_KEY: &str = "files_filemanager";

/// File submissions. Payload content carries the file-area reference list;
/// the actual upload/download mechanics belong to the platform file pool and
/// stay outside this plugin.
pub struct FileAreaPlugin {
    plugin_type: PluginType,
}

impl FileAreaPlugin {
    pub fn new() -> Self {
        Self {
            plugin_type: PluginType::from_static("file"),
        }
    }

    fn max_files(&self, assignment: &Assignment) -> Option<u64> {
        let config = assignment.plugin_config(PluginSubtype::Submission, &self.plugin_type)?;
        match config.settings.get("maxfilesubmissions")? {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.parse().ok(),
            _ => None,
        }
    }
}

impl Default for FileAreaPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PayloadPlugin for FileAreaPlugin {
    fn plugin_type(&self) -> &PluginType {
        &self.plugin_type
    }

    fn is_empty(&self, payload: &PluginPayload) -> bool {
        file_list(&payload.content).is_empty()
    }

    async fn has_changed(
        &self,
        _assignment: &Assignment,
        payload: Option<&PluginPayload>,
        input: &PluginDataMap,
        _user_id: UserId,
    ) -> Result<bool, AppError> {
        let entered = input.get(FILES_KEY).cloned().unwrap_or(Value::Null);
        let stored = payload
            .map(|payload| Value::Array(file_list(&payload.content)))
            .unwrap_or(Value::Null);
        Ok(entered != stored)
    }

    fn size_estimate(
        &self,
        payload: Option<&PluginPayload>,
        input: Option<&PluginDataMap>,
    ) -> u64 {
        let from_input = input.and_then(|input| input.get(FILES_KEY)).map(total_size);

        from_input.unwrap_or_else(|| {
            payload
                .map(|payload| total_size(&payload.content))
                .unwrap_or(0)
        })
    }

    async fn prepare_for_submit(
        &self,
        assignment: &Assignment,
        input: &PluginDataMap,
        out: &mut PluginDataMap,
        _offline: bool,
        _user_id: UserId,
    ) -> Result<(), AppError> {
        let Some(files) = input.get(FILES_KEY) else {
            return Ok(());
        };

        if let Some(limit) = self.max_files(assignment) {
            let count = files.as_array().map(Vec::len).unwrap_or(0) as u64;
            if count > limit {
                return Err(AppError::ValidationError(format!(
                    "too many files: {count} attached where {limit} are allowed"
                )));
            }
        }

        out.insert(FILES_KEY.to_string(), files.clone());
        Ok(())
    }

    async fn prepare_for_sync(
        &self,
        _assignment: &Assignment,
        queued: &PluginDataMap,
        out: &mut PluginDataMap,
    ) -> Result<(), AppError> {
        if let Some(files) = queued.get(FILES_KEY) {
            out.insert(FILES_KEY.to_string(), files.clone());
        }
        Ok(())
    }

    fn can_edit_offline(&self, _assignment: &Assignment, _payload: &PluginPayload) -> bool {
        // File references live in the local pool; nothing is filtered
        // server-side.
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

fn file_list(content: &Value) -> Vec<Value> {
    match content {
        Value::Array(files) => files.clone(),
        Value::Object(map) => map
            .get("files")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn total_size(value: &Value) -> u64 {
    let files = match value {
        Value::Array(files) => files.clone(),
        other => file_list(other),
    };

    files
        .iter()
        .filter_map(|file| file.get("filesize").and_then(Value::as_u64))
        .sum()
}
