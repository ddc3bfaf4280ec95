pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::ports::{
    ActivityLogQueue, ApiFailure, AssignApi, AssignSyncedEvent, CacheInvalidator,
    ConnectivityProbe, LockRegistry, OfflineQueue, PayloadPlugin, PluginDraftStore,
    SyncEventEmitter,
};
pub use application::services::{
    AssignService, AssignSyncService, PluginRegistry, SaveOutcome, SyncError,
};
pub use domain::entities::offline::{SyncReport, SyncTrigger};
pub use infrastructure::database::ConnectionPool;
pub use infrastructure::offline::SqliteOfflineQueue;
pub use shared::config::SyncConfig;
pub use shared::error::AppError;

/// ログ設定の初期化。`RUST_LOG` があればそちらを優先する。
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manabi_sync=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
