use super::fakes::{
    FakeActivityLog, FakeAssignApi, RecordingCache, RecordingEmitter, SwitchableConnectivity,
};
use manabi_sync::domain::entities::offline::{GradeDraft, SubmissionDraft};
use manabi_sync::domain::entities::{
    Assignment, AttemptReopenMethod, FeedbackRecord, PluginConfig, PluginDataMap, PluginPayload,
    PluginSubtype, SubmissionRecord, SubmissionStatusSnapshot,
};
use manabi_sync::domain::value_objects::{
    AssignmentId, CourseId, PluginType, SubmissionStatus, UserId,
};
use manabi_sync::infrastructure::locks::MemoryLockRegistry;
use manabi_sync::infrastructure::plugins::{CommentsPlugin, FileAreaPlugin, OnlineTextPlugin};
use manabi_sync::{
    AssignService, AssignSyncService, PluginDraftStore, PluginRegistry, SqliteOfflineQueue,
    SyncConfig,
};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const ASSIGNMENT: i64 = 42;
pub const COURSE: i64 = 3;
pub const USER_A: i64 = 7;
pub const USER_B: i64 = 8;

pub fn aid(id: i64) -> AssignmentId {
    AssignmentId::new(id).expect("assignment id")
}

pub fn uid(id: i64) -> UserId {
    UserId::new(id).expect("user id")
}

pub struct SyncHarness {
    pub api: Arc<FakeAssignApi>,
    pub queue: Arc<SqliteOfflineQueue>,
    pub locks: Arc<MemoryLockRegistry>,
    pub cache: Arc<RecordingCache>,
    pub emitter: Arc<RecordingEmitter>,
    pub connectivity: Arc<SwitchableConnectivity>,
    pub activity_log: Arc<FakeActivityLog>,
    pub sync: Arc<AssignSyncService>,
    pub service: AssignService,
}

pub async fn harness(assignment: Assignment) -> SyncHarness {
    harness_with_config(assignment, SyncConfig::default()).await
}

pub async fn harness_with_config(assignment: Assignment, config: SyncConfig) -> SyncHarness {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");

    let queue = Arc::new(SqliteOfflineQueue::new(pool));
    let draft_store: Arc<dyn PluginDraftStore> = queue.clone();

    let mut registry = PluginRegistry::new();
    registry.register_submission(Arc::new(OnlineTextPlugin::new(draft_store.clone())));
    registry.register_submission(Arc::new(FileAreaPlugin::new()));
    registry.register_feedback(Arc::new(CommentsPlugin::new(draft_store)));
    let plugins = Arc::new(registry);

    let api = Arc::new(FakeAssignApi::new(assignment));
    let locks = Arc::new(MemoryLockRegistry::new());
    let cache = Arc::new(RecordingCache::new());
    let emitter = Arc::new(RecordingEmitter::new());
    let connectivity = Arc::new(SwitchableConnectivity::new(true));
    let activity_log = Arc::new(FakeActivityLog::new());

    let sync = AssignSyncService::new(
        api.clone(),
        queue.clone(),
        plugins.clone(),
        connectivity.clone(),
        locks.clone(),
        cache.clone(),
        activity_log.clone(),
        Some(emitter.clone()),
        config,
    );

    let service = AssignService::new(
        api.clone(),
        queue.clone(),
        plugins,
        connectivity.clone(),
    );

    SyncHarness {
        api,
        queue,
        locks,
        cache,
        emitter,
        connectivity,
        activity_log,
        sync,
        service,
    }
}

pub fn assignment() -> Assignment {
    Assignment {
        id: aid(ASSIGNMENT),
        course_id: CourseId::new(COURSE).expect("course id"),
        name: "Essay 1".to_string(),
        allow_submissions_from: None,
        due_date: None,
        cutoff_date: None,
        plugin_configs: vec![
            PluginConfig {
                plugin_type: PluginType::from_static("onlinetext"),
                subtype: PluginSubtype::Submission,
                enabled: true,
                settings: json!({}),
            },
            PluginConfig {
                plugin_type: PluginType::from_static("comments"),
                subtype: PluginSubtype::Feedback,
                enabled: true,
                settings: json!({}),
            },
        ],
        team_submission: false,
        blind_marking: false,
        submission_drafts: false,
        marking_workflow: false,
        max_attempts: -1,
        attempt_reopen_method: AttemptReopenMethod::None,
    }
}

pub fn assignment_requiring_submit() -> Assignment {
    let mut assignment = assignment();
    assignment.submission_drafts = true;
    assignment
}

pub fn submission(user: i64, time_modified: i64) -> SubmissionRecord {
    SubmissionRecord {
        id: 1000 + user,
        user_id: uid(user),
        attempt_number: 0,
        status: SubmissionStatus::Draft,
        group_id: None,
        time_modified,
        plugins: vec![PluginPayload::new(
            PluginType::from_static("onlinetext"),
            json!({ "text": "server copy", "format": 1 }),
        )],
    }
}

pub fn status_with_submission(user: i64, time_modified: i64) -> SubmissionStatusSnapshot {
    SubmissionStatusSnapshot {
        submission: Some(submission(user, time_modified)),
        feedback: None,
    }
}

pub fn status_with_feedback(
    user: i64,
    time_modified: i64,
    graded_at: Option<i64>,
) -> SubmissionStatusSnapshot {
    SubmissionStatusSnapshot {
        submission: Some(submission(user, time_modified)),
        feedback: Some(FeedbackRecord {
            grade: Some(5.0),
            graded_at,
            grader_id: None,
            plugins: vec![PluginPayload::new(
                PluginType::from_static("comments"),
                json!({ "text": "previous feedback" }),
            )],
        }),
    }
}

pub fn text_input(text: &str) -> PluginDataMap {
    let mut input = PluginDataMap::new();
    input.insert(
        "onlinetext_editor".to_string(),
        json!({ "text": text, "format": 1 }),
    );
    input
}

pub fn comments_input(text: &str) -> PluginDataMap {
    let mut input = PluginDataMap::new();
    input.insert(
        "assignfeedbackcomments_editor".to_string(),
        json!({ "text": text, "format": 1 }),
    );
    input
}

pub fn queued_submission(user: i64, baseline: i64, submitted: bool) -> SubmissionDraft {
    SubmissionDraft::new(
        aid(ASSIGNMENT),
        CourseId::new(COURSE).expect("course id"),
        uid(user),
        text_input("queued text"),
        baseline,
        submitted,
    )
}

pub fn queued_grade(user: i64, grade: f64) -> GradeDraft {
    GradeDraft::new(
        aid(ASSIGNMENT),
        CourseId::new(COURSE).expect("course id"),
        uid(user),
        Some(grade),
        0,
        false,
        None,
        false,
        BTreeMap::new(),
        comments_input("queued feedback"),
    )
}
