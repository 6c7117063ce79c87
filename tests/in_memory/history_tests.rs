//! Audit trail content and ordering tests.

use super::helpers::{MemoryContext, context, request};
use rstest::rstest;
use serde_json::json;
use triage::task::domain::{HistoryAction, TaskPatch, TaskPriority, TaskStatus};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_mutation_appends_exactly_one_entry(context: MemoryContext) {
    let created = context
        .service
        .create(request("fix login bug", "500 on submit"))
        .await
        .expect("task creation should succeed");

    context
        .service
        .update(
            created.id(),
            TaskPatch::new().with_status(TaskStatus::InProgress),
        )
        .await
        .expect("update should succeed");
    context
        .service
        .update(
            created.id(),
            TaskPatch::new().with_priority(TaskPriority::High),
        )
        .await
        .expect("update should succeed");

    let fetched = context
        .service
        .get(created.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");

    assert_eq!(fetched.history.len(), 3);
    let actions: Vec<HistoryAction> = fetched
        .history
        .iter()
        .map(triage::task::domain::TaskHistoryEntry::action)
        .collect();
    assert_eq!(
        actions,
        vec![
            HistoryAction::Updated,
            HistoryAction::Updated,
            HistoryAction::Created
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_is_ordered_most_recent_first(context: MemoryContext) {
    let created = context
        .service
        .create(request("schedule sync call", "platform weekly"))
        .await
        .expect("task creation should succeed");
    context
        .service
        .update(
            created.id(),
            TaskPatch::new().with_status(TaskStatus::Completed),
        )
        .await
        .expect("update should succeed");

    let fetched = context
        .service
        .get(created.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");

    let timestamps: Vec<_> = fetched
        .history
        .iter()
        .map(|entry| entry.changed_at())
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(timestamps, sorted);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_diff_distinguishes_null_from_omitted(context: MemoryContext) {
    let created = context
        .service
        .create(request("site safety inspection", "north wing"))
        .await
        .expect("task creation should succeed");

    context
        .service
        .update(created.id(), TaskPatch::new().with_description(None))
        .await
        .expect("update should succeed");

    let fetched = context
        .service
        .get(created.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    let entry = fetched
        .history
        .iter()
        .find(|entry| entry.action() == HistoryAction::Updated)
        .expect("update entry");

    let old_values = entry.old_value().expect("old values");
    let new_values = entry.new_value().expect("new values");
    // Only the description was supplied; the null is explicit, not absent.
    assert_eq!(old_values.len(), 1);
    assert_eq!(old_values.get("description"), Some(&json!("north wing")));
    assert_eq!(new_values.get("description"), Some(&serde_json::Value::Null));
    assert_eq!(entry.changed_by(), None);
}
