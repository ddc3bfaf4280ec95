use crate::application::ports::assign_api::{ApiFailure, AssignApi};
use crate::application::ports::connectivity::ConnectivityProbe;
use crate::application::ports::offline_queue::OfflineQueue;
use crate::application::services::assign_sync::SyncError;
use crate::application::services::plugin_registry::PluginRegistry;
use crate::domain::entities::offline::{GradeDraft, OfflineGradeRecord, SubmissionDraft};
use crate::domain::entities::{Assignment, PluginDataMap, SubmissionRecord};
use crate::domain::value_objects::UserId;
use crate::shared::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Where a user-facing write ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Accepted by the site.
    Sent,
    /// Stored in the offline queue, to be reconciled by the next sync.
    Queued,
}

/// User-facing save/submit/grade paths. Online first; transport failures and
/// offline devices fall back to the queue. Authoritative rejections always
/// propagate — a change the site refused is never queued.
pub struct AssignService {
    api: Arc<dyn AssignApi>,
    queue: Arc<dyn OfflineQueue>,
    plugins: Arc<PluginRegistry>,
    connectivity: Arc<dyn ConnectivityProbe>,
}

impl AssignService {
    pub fn new(
        api: Arc<dyn AssignApi>,
        queue: Arc<dyn OfflineQueue>,
        plugins: Arc<PluginRegistry>,
        connectivity: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self {
            api,
            queue,
            plugins,
            connectivity,
        }
    }

    /// Saves submission form input. Plugin validation errors (word limit and
    /// the like) surface synchronously before anything is stored or sent.
    pub async fn save_submission(
        &self,
        assignment: &Assignment,
        user_id: UserId,
        submission: Option<&SubmissionRecord>,
        input: &PluginDataMap,
    ) -> Result<SaveOutcome, SyncError> {
        if !self.connectivity.is_online().await {
            self.ensure_editable_offline(assignment, submission)?;
            self.queue_submission(assignment, user_id, submission, input, false)
                .await?;
            return Ok(SaveOutcome::Queued);
        }

        let plugin_data = self
            .plugins
            .prepare_submission(assignment, submission, input, false, user_id)
            .await?;

        match self
            .api
            .save_submission(assignment.id, user_id, &plugin_data)
            .await
        {
            Ok(()) => {
                info!(
                    target: "assign::service",
                    assignment_id = %assignment.id,
                    %user_id,
                    "submission saved online"
                );
                Ok(SaveOutcome::Sent)
            }
            Err(ApiFailure::Transport(message)) => {
                debug!(
                    target: "assign::service",
                    assignment_id = %assignment.id,
                    error = %message,
                    "save failed on transport, queueing offline"
                );
                self.queue_submission(assignment, user_id, submission, input, false)
                    .await?;
                Ok(SaveOutcome::Queued)
            }
            Err(failure) => Err(SyncError::from(failure)),
        }
    }

    /// Marks the user's current attempt as submitted for grading.
    /// `online_time_modified` is the caller's last known server timestamp,
    /// used as the conflict baseline when the action has to be queued.
    pub async fn submit_for_grading(
        &self,
        assignment: &Assignment,
        user_id: UserId,
        online_time_modified: i64,
    ) -> Result<SaveOutcome, SyncError> {
        if !self.connectivity.is_online().await {
            self.queue_submitted_flag(assignment, user_id, online_time_modified)
                .await?;
            return Ok(SaveOutcome::Queued);
        }

        match self.api.submit_for_grading(assignment.id, user_id).await {
            Ok(()) => Ok(SaveOutcome::Sent),
            Err(ApiFailure::Transport(message)) => {
                debug!(
                    target: "assign::service",
                    assignment_id = %assignment.id,
                    error = %message,
                    "submit failed on transport, queueing offline"
                );
                self.queue_submitted_flag(assignment, user_id, online_time_modified)
                    .await?;
                Ok(SaveOutcome::Queued)
            }
            Err(failure) => Err(SyncError::from(failure)),
        }
    }

    /// Saves a grading action for one student.
    pub async fn submit_grade(
        &self,
        assignment: &Assignment,
        draft: GradeDraft,
    ) -> Result<SaveOutcome, SyncError> {
        if !self.connectivity.is_online().await {
            self.queue_grade(assignment, draft).await?;
            return Ok(SaveOutcome::Queued);
        }

        let plugin_data = self
            .plugins
            .prepare_feedback(assignment, &draft.plugin_data, false, draft.user_id)
            .await?;

        let user_id = draft.user_id;
        let record = OfflineGradeRecord::from_draft(draft.clone(), Utc::now());
        match self
            .api
            .save_grade(assignment.id, user_id, &record, &plugin_data)
            .await
        {
            Ok(()) => {
                info!(
                    target: "assign::service",
                    assignment_id = %assignment.id,
                    %user_id,
                    "grade saved online"
                );
                Ok(SaveOutcome::Sent)
            }
            Err(ApiFailure::Transport(message)) => {
                debug!(
                    target: "assign::service",
                    assignment_id = %assignment.id,
                    error = %message,
                    "grade save failed on transport, queueing offline"
                );
                self.queue_grade(assignment, draft).await?;
                Ok(SaveOutcome::Queued)
            }
            Err(failure) => Err(SyncError::from(failure)),
        }
    }

    fn ensure_editable_offline(
        &self,
        assignment: &Assignment,
        submission: Option<&SubmissionRecord>,
    ) -> Result<(), SyncError> {
        if let Some(submission) = submission {
            if !self.plugins.can_edit_offline(assignment, submission) {
                return Err(SyncError::Validation(
                    "this submission cannot be edited while offline".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Runs the submit prepare with the offline flag so plugins validate and
    /// stash their drafts, then stores the prepared map as the queued record.
    async fn queue_submission(
        &self,
        assignment: &Assignment,
        user_id: UserId,
        submission: Option<&SubmissionRecord>,
        input: &PluginDataMap,
        submitted: bool,
    ) -> Result<(), SyncError> {
        let plugin_data = self
            .plugins
            .prepare_submission(assignment, submission, input, true, user_id)
            .await?;
        let baseline = submission
            .map(|submission| submission.time_modified)
            .unwrap_or(0);

        self.queue
            .save_submission(SubmissionDraft::new(
                assignment.id,
                assignment.course_id,
                user_id,
                plugin_data,
                baseline,
                submitted,
            ))
            .await?;

        info!(
            target: "assign::service",
            assignment_id = %assignment.id,
            %user_id,
            "submission queued offline"
        );
        Ok(())
    }

    async fn queue_grade(&self, assignment: &Assignment, draft: GradeDraft) -> Result<(), SyncError> {
        let user_id = draft.user_id;
        let mut queued = draft;
        queued.plugin_data = self
            .plugins
            .prepare_feedback(assignment, &queued.plugin_data, true, user_id)
            .await?;

        self.queue.save_grade(queued).await?;

        info!(
            target: "assign::service",
            assignment_id = %assignment.id,
            %user_id,
            "grade queued offline"
        );
        Ok(())
    }

    /// Flips the queued record's submitted flag, creating a bare record when
    /// nothing was queued yet.
    async fn queue_submitted_flag(
        &self,
        assignment: &Assignment,
        user_id: UserId,
        online_time_modified: i64,
    ) -> Result<(), SyncError> {
        let draft = match self.queue.get_submission(assignment.id, user_id).await {
            Ok(record) => SubmissionDraft::new(
                record.assignment_id,
                record.course_id,
                record.user_id,
                record.plugin_data,
                record.online_time_modified,
                true,
            ),
            Err(AppError::NotFound(_)) => SubmissionDraft::new(
                assignment.id,
                assignment.course_id,
                user_id,
                PluginDataMap::new(),
                online_time_modified,
                true,
            ),
            Err(err) => return Err(SyncError::from(err)),
        };

        self.queue.save_submission(draft).await?;
        Ok(())
    }
}
