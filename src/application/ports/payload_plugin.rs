use crate::domain::entities::{Assignment, PluginDataMap, PluginPayload};
use crate::domain::value_objects::{AssignmentId, PluginType, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Capability interface implemented by every content-type plugin (text,
/// file, comments, ...). The registry fans these calls out over all plugins
/// attached to a submission or feedback object; a plugin only ever touches
/// its own slice of the payload.
#[async_trait]
pub trait PayloadPlugin: Send + Sync {
    fn plugin_type(&self) -> &PluginType;

    fn is_empty(&self, payload: &PluginPayload) -> bool;

    /// Whether the live form input differs from what the server holds.
    /// May consult the plugin's own offline draft before falling back to the
    /// server payload.
    async fn has_changed(
        &self,
        assignment: &Assignment,
        payload: Option<&PluginPayload>,
        input: &PluginDataMap,
        user_id: UserId,
    ) -> Result<bool, AppError>;

    /// Approximate upload size in bytes, for confirmation prompts. Advisory
    /// only, never safety-critical.
    fn size_estimate(&self, payload: Option<&PluginPayload>, input: Option<&PluginDataMap>)
        -> u64;

    /// Merge this plugin's contribution to an outgoing payload built from
    /// live form input. A validation failure (word limit and the like) must
    /// abort the whole prepare step.
    async fn prepare_for_submit(
        &self,
        assignment: &Assignment,
        input: &PluginDataMap,
        out: &mut PluginDataMap,
        offline: bool,
        user_id: UserId,
    ) -> Result<(), AppError>;

    /// Same, but driven from a previously queued offline record. Used only
    /// by the sync orchestrator.
    async fn prepare_for_sync(
        &self,
        assignment: &Assignment,
        queued: &PluginDataMap,
        out: &mut PluginDataMap,
    ) -> Result<(), AppError>;

    /// Plugins whose content depends on server-side filtering must return
    /// false so the caller refuses offline editing instead of desyncing.
    fn can_edit_offline(&self, assignment: &Assignment, payload: &PluginPayload) -> bool;

    /// Drop any offline draft this plugin holds for the pair.
    async fn remove_offline_data(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), AppError>;
}
