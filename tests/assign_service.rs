mod common;

use common::support::*;
use manabi_sync::domain::entities::PluginSubtype;
use manabi_sync::{ApiFailure, OfflineQueue, PluginDraftStore, SaveOutcome, SyncError};
use serde_json::json;

fn assignment_with_word_limit(limit: i64) -> manabi_sync::domain::entities::Assignment {
    let mut assignment = assignment();
    for config in &mut assignment.plugin_configs {
        if config.subtype == PluginSubtype::Submission
            && config.plugin_type.as_str() == "onlinetext"
        {
            config.settings = json!({ "wordlimitenabled": 1, "wordlimit": limit });
        }
    }
    assignment
}

#[tokio::test]
async fn online_save_reaches_the_site_directly() {
    let harness = harness(assignment()).await;

    let outcome = harness
        .service
        .save_submission(
            &assignment(),
            uid(USER_A),
            Some(&submission(USER_A, 100)),
            &text_input("fresh essay"),
        )
        .await
        .expect("save");

    assert_eq!(outcome, SaveOutcome::Sent);
    assert_eq!(harness.api.save_submission_calls().len(), 1);
    assert!(harness
        .queue
        .get_submission(aid(ASSIGNMENT), uid(USER_A))
        .await
        .is_err());
}

#[tokio::test]
async fn transport_failure_queues_with_the_current_baseline() {
    let harness = harness(assignment()).await;
    harness
        .api
        .fail_save_submission(ApiFailure::Transport("timed out".to_string()));

    let outcome = harness
        .service
        .save_submission(
            &assignment(),
            uid(USER_A),
            Some(&submission(USER_A, 123)),
            &text_input("fresh essay"),
        )
        .await
        .expect("save");

    assert_eq!(outcome, SaveOutcome::Queued);

    let record = harness
        .queue
        .get_submission(aid(ASSIGNMENT), uid(USER_A))
        .await
        .expect("queued record");
    assert_eq!(record.online_time_modified, 123);
    assert!(!record.submitted);
}

#[tokio::test]
async fn offline_save_prepares_with_the_offline_flag() {
    let harness = harness(assignment()).await;
    harness.connectivity.set_online(false);

    let outcome = harness
        .service
        .save_submission(
            &assignment(),
            uid(USER_A),
            Some(&submission(USER_A, 100)),
            &text_input("offline essay"),
        )
        .await
        .expect("save");

    assert_eq!(outcome, SaveOutcome::Queued);
    assert!(harness.api.save_submission_calls().is_empty());

    let record = harness
        .queue
        .get_submission(aid(ASSIGNMENT), uid(USER_A))
        .await
        .expect("queued record");
    assert_eq!(
        record.plugin_data.get("onlinetext_editor").expect("input")["text"],
        json!("offline essay")
    );

    // テキストプラグインはオフライン準備時にドラフトも保存する。
    let draft = harness
        .queue
        .get_draft(
            aid(ASSIGNMENT),
            uid(USER_A),
            &manabi_sync::domain::value_objects::PluginType::from_static("onlinetext"),
        )
        .await
        .expect("draft lookup")
        .expect("draft");
    assert_eq!(draft.content["text"], json!("offline essay"));
}

#[tokio::test]
async fn word_limit_violation_aborts_before_any_store_or_send() {
    let assignment = assignment_with_word_limit(2);
    let harness = harness(assignment.clone()).await;

    let err = harness
        .service
        .save_submission(
            &assignment,
            uid(USER_A),
            Some(&submission(USER_A, 100)),
            &text_input("far too many words here"),
        )
        .await
        .expect_err("should fail validation");

    assert!(matches!(err, SyncError::Validation(_)));
    assert!(harness.api.save_submission_calls().is_empty());
    assert!(harness
        .queue
        .get_submission(aid(ASSIGNMENT), uid(USER_A))
        .await
        .is_err());
}

#[tokio::test]
async fn offline_submit_flips_the_queued_flag() {
    let harness = harness(assignment_requiring_submit()).await;
    harness.connectivity.set_online(false);

    harness
        .service
        .save_submission(
            &assignment_requiring_submit(),
            uid(USER_A),
            Some(&submission(USER_A, 100)),
            &text_input("offline essay"),
        )
        .await
        .expect("offline save");

    let outcome = harness
        .service
        .submit_for_grading(&assignment_requiring_submit(), uid(USER_A), 100)
        .await
        .expect("offline submit");
    assert_eq!(outcome, SaveOutcome::Queued);

    let record = harness
        .queue
        .get_submission(aid(ASSIGNMENT), uid(USER_A))
        .await
        .expect("queued record");
    assert!(record.submitted);
    assert_eq!(
        record.plugin_data.get("onlinetext_editor").expect("input")["text"],
        json!("offline essay")
    );
}

#[tokio::test]
async fn offline_submit_without_a_prior_save_creates_a_bare_record() {
    let harness = harness(assignment_requiring_submit()).await;
    harness.connectivity.set_online(false);

    harness
        .service
        .submit_for_grading(&assignment_requiring_submit(), uid(USER_A), 456)
        .await
        .expect("offline submit");

    let record = harness
        .queue
        .get_submission(aid(ASSIGNMENT), uid(USER_A))
        .await
        .expect("queued record");
    assert!(record.submitted);
    assert!(record.plugin_data.is_empty());
    assert_eq!(record.online_time_modified, 456);
}

#[tokio::test]
async fn authoritative_grade_rejection_is_never_queued() {
    let harness = harness(assignment()).await;
    harness.api.fail_save_grade(ApiFailure::Service {
        code: "nopermission".to_string(),
        message: "grading not allowed".to_string(),
    });

    let err = harness
        .service
        .submit_grade(&assignment(), queued_grade(USER_A, 7.0))
        .await
        .expect_err("should propagate");

    assert!(matches!(err, SyncError::Rejected { .. }));
    assert!(harness
        .queue
        .get_grade(aid(ASSIGNMENT), uid(USER_A))
        .await
        .is_err());
}

#[tokio::test]
async fn offline_grade_is_queued_for_the_next_sync() {
    let harness = harness(assignment()).await;
    harness.connectivity.set_online(false);

    let outcome = harness
        .service
        .submit_grade(&assignment(), queued_grade(USER_A, 7.0))
        .await
        .expect("offline grade");
    assert_eq!(outcome, SaveOutcome::Queued);

    let record = harness
        .queue
        .get_grade(aid(ASSIGNMENT), uid(USER_A))
        .await
        .expect("queued grade");
    assert_eq!(record.grade, Some(7.0));
}
