use async_trait::async_trait;
use manabi_sync::domain::entities::offline::OfflineGradeRecord;
use manabi_sync::domain::entities::{
    Assignment, GradeItem, PluginDataMap, SubmissionStatusSnapshot,
};
use manabi_sync::domain::value_objects::{AssignmentId, CourseId, UserId};
use manabi_sync::shared::error::AppError;
use manabi_sync::{
    ActivityLogQueue, ApiFailure, AssignApi, AssignSyncedEvent, CacheInvalidator,
    ConnectivityProbe, SyncEventEmitter,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct ApiState {
    assignment: Option<Assignment>,
    statuses: HashMap<(i64, i64), SubmissionStatusSnapshot>,
    grade_items: HashMap<(i64, i64), Vec<GradeItem>>,
    save_submission_error: Option<ApiFailure>,
    submit_error: Option<ApiFailure>,
    save_grade_error: Option<ApiFailure>,
    assignment_calls: usize,
    save_submission_calls: Vec<(i64, i64, PluginDataMap)>,
    submit_calls: Vec<(i64, i64)>,
    save_grade_calls: Vec<(i64, i64, OfflineGradeRecord, PluginDataMap)>,
}

/// Scriptable in-memory stand-in for the site gateway. Every mutating call
/// is recorded so tests can assert exactly what reached the server.
pub struct FakeAssignApi {
    state: Mutex<ApiState>,
}

impl FakeAssignApi {
    pub fn new(assignment: Assignment) -> Self {
        Self {
            state: Mutex::new(ApiState {
                assignment: Some(assignment),
                ..ApiState::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ApiState> {
        self.state.lock().unwrap()
    }

    pub fn set_status(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
        snapshot: SubmissionStatusSnapshot,
    ) {
        self.lock()
            .statuses
            .insert((assignment_id.as_i64(), user_id.as_i64()), snapshot);
    }

    pub fn set_grade_items(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
        items: Vec<GradeItem>,
    ) {
        self.lock()
            .grade_items
            .insert((assignment_id.as_i64(), user_id.as_i64()), items);
    }

    pub fn fail_save_submission(&self, failure: ApiFailure) {
        self.lock().save_submission_error = Some(failure);
    }

    pub fn fail_submit(&self, failure: ApiFailure) {
        self.lock().submit_error = Some(failure);
    }

    pub fn fail_save_grade(&self, failure: ApiFailure) {
        self.lock().save_grade_error = Some(failure);
    }

    pub fn assignment_calls(&self) -> usize {
        self.lock().assignment_calls
    }

    pub fn save_submission_calls(&self) -> Vec<(i64, i64, PluginDataMap)> {
        self.lock().save_submission_calls.clone()
    }

    pub fn submit_calls(&self) -> Vec<(i64, i64)> {
        self.lock().submit_calls.clone()
    }

    pub fn save_grade_calls(&self) -> Vec<(i64, i64, OfflineGradeRecord, PluginDataMap)> {
        self.lock().save_grade_calls.clone()
    }
}

#[async_trait]
impl AssignApi for FakeAssignApi {
    async fn assignment(&self, assignment_id: AssignmentId) -> Result<Assignment, ApiFailure> {
        let mut state = self.lock();
        state.assignment_calls += 1;
        state
            .assignment
            .iter()
            .find(|assignment| assignment.id == assignment_id)
            .cloned()
            .ok_or_else(|| ApiFailure::Service {
                code: "invalidrecord".to_string(),
                message: format!("unknown assignment {assignment_id}"),
            })
    }

    async fn submission_status(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<SubmissionStatusSnapshot, ApiFailure> {
        Ok(self
            .lock()
            .statuses
            .get(&(assignment_id.as_i64(), user_id.as_i64()))
            .cloned()
            .unwrap_or(SubmissionStatusSnapshot {
                submission: None,
                feedback: None,
            }))
    }

    async fn save_submission(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
        plugin_data: &PluginDataMap,
    ) -> Result<(), ApiFailure> {
        let mut state = self.lock();
        if let Some(failure) = state.save_submission_error.clone() {
            return Err(failure);
        }
        state.save_submission_calls.push((
            assignment_id.as_i64(),
            user_id.as_i64(),
            plugin_data.clone(),
        ));
        Ok(())
    }

    async fn submit_for_grading(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<(), ApiFailure> {
        let mut state = self.lock();
        if let Some(failure) = state.submit_error.clone() {
            return Err(failure);
        }
        state
            .submit_calls
            .push((assignment_id.as_i64(), user_id.as_i64()));
        Ok(())
    }

    async fn save_grade(
        &self,
        assignment_id: AssignmentId,
        user_id: UserId,
        grade: &OfflineGradeRecord,
        plugin_data: &PluginDataMap,
    ) -> Result<(), ApiFailure> {
        let mut state = self.lock();
        if let Some(failure) = state.save_grade_error.clone() {
            return Err(failure);
        }
        state.save_grade_calls.push((
            assignment_id.as_i64(),
            user_id.as_i64(),
            grade.clone(),
            plugin_data.clone(),
        ));
        Ok(())
    }

    async fn grade_items(
        &self,
        _course_id: CourseId,
        assignment_id: AssignmentId,
        user_id: UserId,
    ) -> Result<Vec<GradeItem>, ApiFailure> {
        Ok(self
            .lock()
            .grade_items
            .get(&(assignment_id.as_i64(), user_id.as_i64()))
            .cloned()
            .unwrap_or_default())
    }
}

pub struct SwitchableConnectivity {
    online: AtomicBool,
}

impl SwitchableConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectivityProbe for SwitchableConnectivity {
    async fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct RecordingCache {
    invalidated: Mutex<Vec<i64>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidated(&self) -> Vec<i64> {
        self.invalidated.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingCache {
    async fn invalidate(&self, assignment_id: AssignmentId) -> Result<(), AppError> {
        self.invalidated.lock().unwrap().push(assignment_id.as_i64());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<AssignSyncedEvent>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AssignSyncedEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SyncEventEmitter for RecordingEmitter {
    fn emit_synced(&self, event: &AssignSyncedEvent) -> Result<(), String> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeActivityLog {
    pending: Mutex<Vec<i64>>,
    flushed: Mutex<Vec<i64>>,
}

impl FakeActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_pending(&self, assignment_id: AssignmentId) {
        self.pending.lock().unwrap().push(assignment_id.as_i64());
    }

    pub fn flushed(&self) -> Vec<i64> {
        self.flushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivityLogQueue for FakeActivityLog {
    async fn has_pending(&self, assignment_id: AssignmentId) -> Result<bool, AppError> {
        Ok(self
            .pending
            .lock()
            .unwrap()
            .contains(&assignment_id.as_i64()))
    }

    async fn flush(&self, assignment_id: AssignmentId) -> Result<(), ApiFailure> {
        let mut pending = self.pending.lock().unwrap();
        pending.retain(|id| *id != assignment_id.as_i64());
        self.flushed.lock().unwrap().push(assignment_id.as_i64());
        Ok(())
    }
}
