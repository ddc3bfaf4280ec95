pub mod assign_service;
pub mod assign_sync;
pub mod plugin_registry;

pub use assign_service::{AssignService, SaveOutcome};
pub use assign_sync::{AssignSyncService, SyncError};
pub use plugin_registry::{NoopPlugin, PluginRegistry};
