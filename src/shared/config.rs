use std::time::Duration;

/// 同期まわりの設定。値は環境変数で上書きできる。
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Minimum interval between automatic syncs of the same assignment.
    pub cooldown: Duration,
    /// Lock namespace used for whole-assignment sync blocks.
    pub sync_component: String,
    /// Lock namespace used for per-(assignment, user) grading blocks.
    pub grading_component: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(300),
            sync_component: "assign_sync".to_string(),
            grading_component: "assign_grading".to_string(),
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("MANABI_SYNC_COOLDOWN_SECS") {
            if let Ok(secs) = value.parse::<u64>() {
                config.cooldown = Duration::from_secs(secs);
            }
        }
        config
    }

    /// Lock key for a per-user grading block.
    pub fn grading_key(assignment_id: i64, user_id: i64) -> String {
        format!("{assignment_id}:{user_id}")
    }
}
