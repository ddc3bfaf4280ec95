use crate::domain::entities::offline::SyncTrigger;
use crate::domain::value_objects::{AssignmentId, UserId};
use serde::{Deserialize, Serialize};

/// Payload announced after every completed sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignSyncedEvent {
    pub assignment_id: AssignmentId,
    pub warnings: Vec<String>,
    pub grades_blocked: Vec<UserId>,
    pub trigger: SyncTrigger,
}

/// 同期完了イベントの発行口。シェル側 (Tauri など) が実装する。
pub trait SyncEventEmitter: Send + Sync {
    fn emit_synced(&self, event: &AssignSyncedEvent) -> Result<(), String>;
}
