pub mod activity_log;
pub mod assign_api;
pub mod cache;
pub mod connectivity;
pub mod event_bus;
pub mod locks;
pub mod offline_queue;
pub mod payload_plugin;

pub use activity_log::ActivityLogQueue;
pub use assign_api::{ApiFailure, AssignApi};
pub use cache::CacheInvalidator;
pub use connectivity::ConnectivityProbe;
pub use event_bus::{AssignSyncedEvent, SyncEventEmitter};
pub use locks::LockRegistry;
pub use offline_queue::{OfflineQueue, PluginDraftStore};
pub use payload_plugin::PayloadPlugin;
