//! Filtered listing and count tests against `PostgreSQL`.

use super::helpers::{BoxError, PgContext, PostgresCluster, postgres_cluster, prepared_context};
use rstest::rstest;
use triage::task::{
    domain::{TaskCategory, TaskListQuery, TaskPriority},
    services::CreateTaskRequest,
};

async fn seed_tasks(context: &PgContext, count: usize, title: &str) {
    for index in 0..count {
        context
            .service
            .create(CreateTaskRequest::new(format!("{title} {index}")))
            .await
            .expect("task creation should succeed");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn last_partial_page_reports_total_and_page_number(
    postgres_cluster: Option<PostgresCluster>,
) -> Result<(), BoxError> {
    let Some(context) = prepared_context(postgres_cluster).await? else {
        return Ok(());
    };

    seed_tasks(&context, 25, "routine chore").await;

    let page = context
        .service
        .list(TaskListQuery::new().with_limit(10).with_offset(20))
        .await
        .expect("listing should succeed");

    assert_eq!(page.tasks.len(), 5);
    assert_eq!(page.pagination.page, 3);
    assert_eq!(page.pagination.limit, 10);
    assert_eq!(page.pagination.total, 25);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn newest_tasks_come_first(
    postgres_cluster: Option<PostgresCluster>,
) -> Result<(), BoxError> {
    let Some(context) = prepared_context(postgres_cluster).await? else {
        return Ok(());
    };

    seed_tasks(&context, 5, "routine chore").await;

    let page = context
        .service
        .list(TaskListQuery::new())
        .await
        .expect("listing should succeed");

    let timestamps: Vec<_> = page.tasks.iter().map(|task| task.created_at()).collect();
    let mut sorted = timestamps.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(timestamps, sorted);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filters_narrow_both_page_and_total(
    postgres_cluster: Option<PostgresCluster>,
) -> Result<(), BoxError> {
    let Some(context) = prepared_context(postgres_cluster).await? else {
        return Ok(());
    };

    context
        .service
        .create(CreateTaskRequest::new("process invoice payment"))
        .await
        .expect("task creation should succeed");
    context
        .service
        .create(CreateTaskRequest::new("urgent budget review"))
        .await
        .expect("task creation should succeed");
    context
        .service
        .create(CreateTaskRequest::new("fix login bug"))
        .await
        .expect("task creation should succeed");

    let finance = context
        .service
        .list(TaskListQuery::new().with_category(TaskCategory::Finance))
        .await
        .expect("listing should succeed");
    assert_eq!(finance.pagination.total, 2);
    assert_eq!(finance.tasks.len(), 2);

    let urgent_finance = context
        .service
        .list(
            TaskListQuery::new()
                .with_category(TaskCategory::Finance)
                .with_priority(TaskPriority::High),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(urgent_finance.pagination.total, 1);
    assert_eq!(
        urgent_finance
            .tasks
            .first()
            .map(|task| task.title().as_str()),
        Some("urgent budget review")
    );
    Ok(())
}
