/// Cooperative edit locks, keyed by (component, key). The grading UI blocks
/// a pair while a teacher has it open; the orchestrator checks before
/// touching queued data. Two callers never share keys across components.
pub trait LockRegistry: Send + Sync {
    fn is_blocked(&self, component: &str, key: &str) -> bool;

    fn block(&self, component: &str, key: &str);

    fn unblock(&self, component: &str, key: &str);
}
