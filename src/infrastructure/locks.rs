use crate::application::ports::locks::LockRegistry;
use std::collections::HashSet;
use std::sync::Mutex;

/// In-process lock registry shared between the grading UI and the sync
/// orchestrator. Keys are plain strings; components never share a namespace.
#[derive(Default)]
pub struct MemoryLockRegistry {
    blocked: Mutex<HashSet<(String, String)>>,
}

impl MemoryLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashSet<(String, String)>> {
        self.blocked
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LockRegistry for MemoryLockRegistry {
    fn is_blocked(&self, component: &str, key: &str) -> bool {
        self.entries()
            .contains(&(component.to_string(), key.to_string()))
    }

    fn block(&self, component: &str, key: &str) {
        self.entries()
            .insert((component.to_string(), key.to_string()));
    }

    fn unblock(&self, component: &str, key: &str) {
        self.entries()
            .remove(&(component.to_string(), key.to_string()));
    }
}
