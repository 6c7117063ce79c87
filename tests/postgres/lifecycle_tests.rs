//! Create/update/delete round trips against `PostgreSQL`.

use super::helpers::{BoxError, PostgresCluster, postgres_cluster, prepared_context, request};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use triage::task::{
    domain::{TaskCategory, TaskPatch, TaskPriority, TaskStatus, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
    services::CreateTaskRequest,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_round_trips_with_classification_payload(
    postgres_cluster: Option<PostgresCluster>,
) -> Result<(), BoxError> {
    let Some(context) = prepared_context(postgres_cluster).await? else {
        return Ok(());
    };

    let due = Utc
        .with_ymd_and_hms(2026, 9, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let created = context
        .service
        .create(
            CreateTaskRequest::new("Schedule urgent meeting")
                .with_description("standup with the platform team")
                .with_assigned_to("alice")
                .with_due_date(due),
        )
        .await
        .expect("task creation should succeed");

    let fetched = context
        .repository
        .find_by_id(created.id())
        .await
        .expect("repository lookup should succeed")
        .expect("task should exist in the database");

    assert_eq!(fetched.id(), created.id());
    assert_eq!(fetched.title().as_str(), "Schedule urgent meeting");
    assert_eq!(fetched.category(), TaskCategory::Scheduling);
    assert_eq!(fetched.priority(), TaskPriority::High);
    assert_eq!(fetched.status(), TaskStatus::Pending);
    assert_eq!(fetched.due_date(), Some(due));
    // JSONB payloads survive the round trip intact.
    assert_eq!(fetched.extracted_entities(), created.extracted_entities());
    assert_eq!(fetched.suggested_actions(), created.suggested_actions());
    assert_eq!(
        fetched.created_at().timestamp_micros(),
        created.created_at().timestamp_micros()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_task_identifier_is_rejected(
    postgres_cluster: Option<PostgresCluster>,
) -> Result<(), BoxError> {
    let Some(context) = prepared_context(postgres_cluster).await? else {
        return Ok(());
    };

    let created = context
        .service
        .create(request("fix login bug", "500 on submit"))
        .await
        .expect("task creation should succeed");

    let result = context.repository.insert(&created).await;
    assert!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateTask(id)) if id == created.id()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_persists_patched_columns_and_explicit_nulls(
    postgres_cluster: Option<PostgresCluster>,
) -> Result<(), BoxError> {
    let Some(context) = prepared_context(postgres_cluster).await? else {
        return Ok(());
    };

    let created = context
        .service
        .create(
            CreateTaskRequest::new("process invoice payment")
                .with_description("monthly vendor billing")
                .with_assigned_to("bob"),
        )
        .await
        .expect("task creation should succeed");

    let title = TaskTitle::new("process invoice payment (Q3)").expect("valid task title");
    let patch = TaskPatch::new()
        .with_title(title)
        .with_status(TaskStatus::InProgress)
        .with_assigned_to(None);
    context
        .service
        .update(created.id(), patch)
        .await
        .expect("update should succeed")
        .expect("task should exist");

    let fetched = context
        .repository
        .find_by_id(created.id())
        .await
        .expect("repository lookup should succeed")
        .expect("task should exist in the database");

    assert_eq!(fetched.title().as_str(), "process invoice payment (Q3)");
    assert_eq!(fetched.status(), TaskStatus::InProgress);
    assert_eq!(fetched.assigned_to(), None);
    // Untouched columns keep their values.
    assert_eq!(fetched.description(), Some("monthly vendor billing"));
    assert_eq!(fetched.category(), TaskCategory::Finance);
    assert!(fetched.updated_at() > fetched.created_at());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repository_update_on_missing_task_reports_not_found(
    postgres_cluster: Option<PostgresCluster>,
) -> Result<(), BoxError> {
    let Some(context) = prepared_context(postgres_cluster).await? else {
        return Ok(());
    };

    let created = context
        .service
        .create(request("fix login bug", "500 on submit"))
        .await
        .expect("task creation should succeed");
    context
        .service
        .delete(created.id())
        .await
        .expect("delete should succeed");

    let result = context
        .repository
        .update(&created, &TaskPatch::new().with_status(TaskStatus::Completed))
        .await;
    assert!(matches!(
        result,
        Err(TaskRepositoryError::NotFound(id)) if id == created.id()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_returns_false_for_missing_task(
    postgres_cluster: Option<PostgresCluster>,
) -> Result<(), BoxError> {
    let Some(context) = prepared_context(postgres_cluster).await? else {
        return Ok(());
    };

    let deleted = context
        .service
        .delete(triage::task::domain::TaskId::new())
        .await
        .expect("delete should succeed");
    assert!(!deleted);
    Ok(())
}
