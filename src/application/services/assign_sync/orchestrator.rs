use crate::application::ports::activity_log::ActivityLogQueue;
use crate::application::ports::assign_api::{ApiFailure, AssignApi};
use crate::application::ports::cache::CacheInvalidator;
use crate::application::ports::connectivity::ConnectivityProbe;
use crate::application::ports::event_bus::{AssignSyncedEvent, SyncEventEmitter};
use crate::application::ports::locks::LockRegistry;
use crate::application::ports::offline_queue::OfflineQueue;
use crate::application::services::assign_sync::error::SyncError;
use crate::application::services::plugin_registry::PluginRegistry;
use crate::domain::entities::offline::{
    OfflineGradeRecord, OfflineSubmissionRecord, SyncReport, SyncTimeRecord, SyncTrigger,
};
use crate::domain::entities::{Assignment, GradeItem};
use crate::domain::value_objects::{AssignmentId, UserId};
use crate::shared::config::SyncConfig;
use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

type SharedRun = Shared<BoxFuture<'static, Result<SyncReport, SyncError>>>;
type InFlightMap = HashMap<AssignmentId, SharedRun>;

/// Reconciles the offline queue against authoritative server state, one
/// assignment at a time. The only layer allowed to decide discard vs. retry;
/// every collaborator below it just reports facts.
///
/// Once a run starts it always completes (push, discard or error) so the
/// queue never ends up half-applied; callers wanting to avoid a run check the
/// lock registry before starting one.
pub struct AssignSyncService {
    api: Arc<dyn AssignApi>,
    queue: Arc<dyn OfflineQueue>,
    plugins: Arc<PluginRegistry>,
    connectivity: Arc<dyn ConnectivityProbe>,
    locks: Arc<dyn LockRegistry>,
    cache: Arc<dyn CacheInvalidator>,
    activity_log: Arc<dyn ActivityLogQueue>,
    emitter: Option<Arc<dyn SyncEventEmitter>>,
    config: SyncConfig,
    in_flight: Mutex<InFlightMap>,
}

impl AssignSyncService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api: Arc<dyn AssignApi>,
        queue: Arc<dyn OfflineQueue>,
        plugins: Arc<PluginRegistry>,
        connectivity: Arc<dyn ConnectivityProbe>,
        locks: Arc<dyn LockRegistry>,
        cache: Arc<dyn CacheInvalidator>,
        activity_log: Arc<dyn ActivityLogQueue>,
        emitter: Option<Arc<dyn SyncEventEmitter>>,
        config: SyncConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            api,
            queue,
            plugins,
            connectivity,
            locks,
            cache,
            activity_log,
            emitter,
            config,
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    /// Syncs one assignment. A second caller arriving while a run is in
    /// flight attaches to the existing run and receives the same result.
    pub async fn sync_assignment(
        self: &Arc<Self>,
        assignment_id: AssignmentId,
        trigger: SyncTrigger,
    ) -> Result<SyncReport, SyncError> {
        let run = {
            let mut in_flight = self.in_flight_entries();
            if let Some(existing) = in_flight.get(&assignment_id) {
                debug!(
                    target: "assign::sync",
                    %assignment_id,
                    "sync already in flight, attaching to its result"
                );
                existing.clone()
            } else {
                let service = Arc::clone(self);
                let run: SharedRun = async move {
                    let outcome = service.run(assignment_id, trigger).await;
                    service.in_flight_entries().remove(&assignment_id);
                    outcome
                }
                .boxed()
                .shared();
                in_flight.insert(assignment_id, run.clone());
                run
            }
        };

        run.await
    }

    /// Cooldown-gated automatic sync. Returns `None` when the last recorded
    /// run is still fresh.
    pub async fn sync_if_needed(
        self: &Arc<Self>,
        assignment_id: AssignmentId,
    ) -> Result<Option<SyncReport>, SyncError> {
        if let Some(last) = self.queue.last_sync(assignment_id).await? {
            let elapsed = Utc::now().signed_duration_since(last.synced_at);
            if elapsed.num_seconds() < self.config.cooldown.as_secs() as i64 {
                debug!(
                    target: "assign::sync",
                    %assignment_id,
                    elapsed_secs = elapsed.num_seconds(),
                    "within sync cooldown, skipping"
                );
                return Ok(None);
            }
        }

        self.sync_assignment(assignment_id, SyncTrigger::Automatic)
            .await
            .map(Some)
    }

    /// Syncs every assignment with pending offline data, independently.
    /// One assignment's failure never blocks another's sync.
    pub async fn sync_all_pending(
        self: &Arc<Self>,
        trigger: SyncTrigger,
    ) -> Result<Vec<(AssignmentId, SyncReport)>, SyncError> {
        let assignment_ids = self.queue.list_assignments_with_pending_data().await?;

        let runs = assignment_ids.into_iter().map(|assignment_id| {
            let service = Arc::clone(self);
            async move {
                (
                    assignment_id,
                    service.sync_assignment(assignment_id, trigger).await,
                )
            }
        });
        let outcomes = futures::future::join_all(runs).await;

        let mut reports = Vec::new();
        for (assignment_id, outcome) in outcomes {
            match outcome {
                Ok(report) => reports.push((assignment_id, report)),
                Err(err) if err.is_transient() => {
                    debug!(
                        target: "assign::sync",
                        %assignment_id,
                        error = %err,
                        "assignment sync deferred"
                    );
                }
                Err(err) => {
                    warn!(
                        target: "assign::sync",
                        %assignment_id,
                        error = %err,
                        "assignment sync failed"
                    );
                }
            }
        }
        Ok(reports)
    }

    async fn run(
        &self,
        assignment_id: AssignmentId,
        trigger: SyncTrigger,
    ) -> Result<SyncReport, SyncError> {
        if self
            .locks
            .is_blocked(&self.config.sync_component, &assignment_id.to_string())
        {
            debug!(target: "assign::sync", %assignment_id, "assignment is blocked, not syncing");
            return Err(SyncError::Blocked(assignment_id));
        }

        let submissions = self.queue.submissions_for_assignment(assignment_id).await?;
        let grades = self.queue.grades_for_assignment(assignment_id).await?;
        let has_logs = self.activity_log.has_pending(assignment_id).await?;

        let mut report = SyncReport::default();

        if submissions.is_empty() && grades.is_empty() && !has_logs {
            self.record_completion(assignment_id, &report).await?;
            return Ok(report);
        }

        if !self.connectivity.is_online().await {
            debug!(target: "assign::sync", %assignment_id, "device offline, sync deferred");
            return Err(SyncError::Offline);
        }

        info!(
            target: "assign::sync",
            %assignment_id,
            submissions = submissions.len(),
            grades = grades.len(),
            "starting assignment sync"
        );

        let assignment = self.api.assignment(assignment_id).await?;

        for record in &submissions {
            self.sync_submission(&assignment, record, &mut report)
                .await?;
        }
        for record in grades {
            self.sync_grade(&assignment, record, &mut report).await?;
        }

        if has_logs {
            self.activity_log.flush(assignment_id).await?;
        }

        if report.updated {
            if let Err(err) = self.cache.invalidate(assignment_id).await {
                warn!(
                    target: "assign::sync",
                    %assignment_id,
                    error = %err,
                    "failed to invalidate cached assignment data"
                );
            }
        }

        self.record_completion(assignment_id, &report).await?;
        self.emit(assignment_id, &report, trigger);

        Ok(report)
    }

    /// Reconciles one queued submission. Transient failures propagate and
    /// abort the run with the record still queued; everything else resolves
    /// the record here, one way or the other.
    async fn sync_submission(
        &self,
        assignment: &Assignment,
        record: &OfflineSubmissionRecord,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let status = self
            .api
            .submission_status(assignment.id, record.user_id)
            .await?;

        if status.submission_time_modified() != record.online_time_modified {
            // Server moved past the baseline; the local edit loses, whatever
            // fields it touched.
            self.discard_submission(assignment, record).await?;
            report.warn(stale_submission_warning(assignment, record.user_id));
            report.updated = true;
            info!(
                target: "assign::sync",
                assignment_id = %assignment.id,
                user_id = %record.user_id,
                "baseline mismatch, offline submission discarded"
            );
            return Ok(());
        }

        let plugin_data = self
            .plugins
            .prepare_submission_sync(assignment, status.submission.as_ref(), record)
            .await?;

        if !plugin_data.is_empty() {
            match self
                .api
                .save_submission(assignment.id, record.user_id, &plugin_data)
                .await
            {
                Ok(()) => {}
                Err(ApiFailure::Transport(message)) => return Err(SyncError::Transport(message)),
                Err(failure) => {
                    self.discard_submission(assignment, record).await?;
                    report.warn(rejected_submission_warning(
                        assignment,
                        record.user_id,
                        &failure,
                    ));
                    report.updated = true;
                    warn!(
                        target: "assign::sync",
                        assignment_id = %assignment.id,
                        user_id = %record.user_id,
                        error = %failure,
                        "submission rejected by the site, discarded"
                    );
                    return Ok(());
                }
            }
        }

        if record.submitted && assignment.submission_drafts {
            match self
                .api
                .submit_for_grading(assignment.id, record.user_id)
                .await
            {
                Ok(()) => {}
                Err(ApiFailure::Transport(message)) => return Err(SyncError::Transport(message)),
                Err(failure) => {
                    self.discard_submission(assignment, record).await?;
                    report.warn(rejected_submission_warning(
                        assignment,
                        record.user_id,
                        &failure,
                    ));
                    report.updated = true;
                    return Ok(());
                }
            }
        }

        self.discard_submission(assignment, record).await?;
        report.updated = true;
        info!(
            target: "assign::sync",
            assignment_id = %assignment.id,
            user_id = %record.user_id,
            "offline submission pushed"
        );
        Ok(())
    }

    /// Reconciles one queued grading action. A per-user block is a distinct,
    /// non-fatal outcome; the rest of the batch proceeds.
    async fn sync_grade(
        &self,
        assignment: &Assignment,
        mut record: OfflineGradeRecord,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let grading_key =
            SyncConfig::grading_key(assignment.id.as_i64(), record.user_id.as_i64());
        if self
            .locks
            .is_blocked(&self.config.grading_component, &grading_key)
        {
            debug!(
                target: "assign::sync",
                assignment_id = %assignment.id,
                user_id = %record.user_id,
                "grade is being edited elsewhere, left queued"
            );
            report.grades_blocked.push(record.user_id);
            return Ok(());
        }

        let status = self
            .api
            .submission_status(assignment.id, record.user_id)
            .await?;

        let offline_time = record.modified_at.timestamp();
        let online_graded_at = status
            .feedback
            .as_ref()
            .and_then(|feedback| feedback.graded_at)
            .unwrap_or(0);

        if online_graded_at > offline_time {
            self.discard_grade(assignment, &record).await?;
            report.warn(stale_grade_warning(assignment, record.user_id));
            report.updated = true;
            info!(
                target: "assign::sync",
                assignment_id = %assignment.id,
                user_id = %record.user_id,
                "feedback graded online after the offline edit, grade discarded"
            );
            return Ok(());
        }

        // Gradebook wins over a stale offline edit, but the push still goes
        // ahead with the corrected values.
        let items = self
            .api
            .grade_items(assignment.course_id, assignment.id, record.user_id)
            .await?;
        apply_gradebook_overrides(&mut record, &items, offline_time);

        let plugin_data = self
            .plugins
            .prepare_feedback_sync(assignment, status.feedback.as_ref(), &record)
            .await?;

        match self
            .api
            .save_grade(assignment.id, record.user_id, &record, &plugin_data)
            .await
        {
            Ok(()) => {
                self.discard_grade(assignment, &record).await?;
                report.updated = true;
                info!(
                    target: "assign::sync",
                    assignment_id = %assignment.id,
                    user_id = %record.user_id,
                    "offline grade pushed"
                );
            }
            Err(ApiFailure::Transport(message)) => return Err(SyncError::Transport(message)),
            Err(failure) => {
                self.discard_grade(assignment, &record).await?;
                report.warn(rejected_grade_warning(assignment, record.user_id, &failure));
                report.updated = true;
                warn!(
                    target: "assign::sync",
                    assignment_id = %assignment.id,
                    user_id = %record.user_id,
                    error = %failure,
                    "grade rejected by the site, discarded"
                );
            }
        }
        Ok(())
    }

    async fn discard_submission(
        &self,
        assignment: &Assignment,
        record: &OfflineSubmissionRecord,
    ) -> Result<(), SyncError> {
        self.plugins
            .remove_submission_drafts(assignment.id, record.user_id)
            .await?;
        self.queue
            .delete_submission(assignment.id, record.user_id)
            .await?;
        Ok(())
    }

    async fn discard_grade(
        &self,
        assignment: &Assignment,
        record: &OfflineGradeRecord,
    ) -> Result<(), SyncError> {
        self.plugins
            .remove_feedback_drafts(assignment.id, record.user_id)
            .await?;
        self.queue
            .delete_grade(assignment.id, record.user_id)
            .await?;
        Ok(())
    }

    async fn record_completion(
        &self,
        assignment_id: AssignmentId,
        report: &SyncReport,
    ) -> Result<(), SyncError> {
        self.queue
            .record_sync_time(
                assignment_id,
                SyncTimeRecord {
                    synced_at: Utc::now(),
                    warnings: report.warnings.clone(),
                },
            )
            .await?;
        Ok(())
    }

    fn emit(&self, assignment_id: AssignmentId, report: &SyncReport, trigger: SyncTrigger) {
        let Some(emitter) = &self.emitter else {
            return;
        };
        let event = AssignSyncedEvent {
            assignment_id,
            warnings: report.warnings.clone(),
            grades_blocked: report.grades_blocked.clone(),
            trigger,
        };
        if let Err(err) = emitter.emit_synced(&event) {
            warn!(
                target: "assign::sync",
                %assignment_id,
                error = %err,
                "failed to emit sync completion event"
            );
        }
    }

    fn in_flight_entries(&self) -> MutexGuard<'_, InFlightMap> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Overwrites offline values with gradebook entries graded at or after the
/// offline edit. Outcome items update the outcome map; the plain grade item
/// replaces the numeric grade.
fn apply_gradebook_overrides(
    record: &mut OfflineGradeRecord,
    items: &[GradeItem],
    offline_time: i64,
) {
    for item in items {
        let Some(graded_at) = item.graded_at else {
            continue;
        };
        if graded_at < offline_time {
            continue;
        }
        match item.outcome_id {
            Some(outcome_id) => {
                if let Some(value) = item.grade {
                    record.outcomes.insert(outcome_id, value);
                }
            }
            None => {
                record.grade = item.grade;
            }
        }
    }
}

fn stale_submission_warning(assignment: &Assignment, user_id: UserId) -> String {
    format!(
        "Submission for user {user_id} in '{}' was modified on the site; the offline changes were discarded.",
        assignment.name
    )
}

fn rejected_submission_warning(
    assignment: &Assignment,
    user_id: UserId,
    failure: &ApiFailure,
) -> String {
    format!(
        "Submission for user {user_id} in '{}' could not be saved and was discarded: {failure}",
        assignment.name
    )
}

fn stale_grade_warning(assignment: &Assignment, user_id: UserId) -> String {
    format!(
        "Grade for user {user_id} in '{}' was updated on the site; the offline grade was discarded.",
        assignment.name
    )
}

fn rejected_grade_warning(assignment: &Assignment, user_id: UserId, failure: &ApiFailure) -> String {
    format!(
        "Grade for user {user_id} in '{}' could not be saved and was discarded: {failure}",
        assignment.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn grade_record(offline_time: i64) -> OfflineGradeRecord {
        OfflineGradeRecord {
            assignment_id: AssignmentId::new(42).unwrap(),
            course_id: crate::domain::value_objects::CourseId::new(3).unwrap(),
            user_id: UserId::new(7).unwrap(),
            grade: Some(5.0),
            attempt_number: 0,
            add_attempt: false,
            workflow_state: None,
            apply_to_all: false,
            outcomes: BTreeMap::new(),
            plugin_data: crate::domain::entities::PluginDataMap::new(),
            modified_at: chrono::DateTime::from_timestamp(offline_time, 0).unwrap(),
        }
    }

    #[test]
    fn gradebook_override_replaces_stale_numeric_grade() {
        let mut record = grade_record(100);
        let items = vec![GradeItem {
            outcome_id: None,
            grade: Some(9.0),
            graded_at: Some(100),
        }];

        // gradedategraded >= timemodified なら gradebook の値を採用する。
        apply_gradebook_overrides(&mut record, &items, 100);
        assert_eq!(record.grade, Some(9.0));
    }

    #[test]
    fn older_gradebook_entries_leave_the_offline_grade_alone() {
        let mut record = grade_record(100);
        let items = vec![GradeItem {
            outcome_id: None,
            grade: Some(9.0),
            graded_at: Some(99),
        }];

        apply_gradebook_overrides(&mut record, &items, 100);
        assert_eq!(record.grade, Some(5.0));
    }

    #[test]
    fn outcome_items_update_the_outcome_map() {
        let mut record = grade_record(100);
        record.outcomes.insert(12, 1.0);
        let items = vec![
            GradeItem {
                outcome_id: Some(12),
                grade: Some(3.0),
                graded_at: Some(150),
            },
            GradeItem {
                outcome_id: Some(13),
                grade: Some(2.0),
                graded_at: None,
            },
        ];

        apply_gradebook_overrides(&mut record, &items, 100);
        assert_eq!(record.outcomes.get(&12), Some(&3.0));
        assert_eq!(record.outcomes.get(&13), None);
        assert_eq!(record.grade, Some(5.0));
    }
}
