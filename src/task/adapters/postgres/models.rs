//! Diesel row models for task and history persistence.

use super::schema::{task_history, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Category storage name.
    pub category: String,
    /// Priority storage name.
    pub priority: String,
    /// Workflow status storage name.
    pub status: String,
    /// Optional assignee.
    pub assigned_to: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Entity summary JSON payload.
    pub extracted_entities: Value,
    /// Suggested actions JSON payload.
    pub suggested_actions: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Category storage name.
    pub category: String,
    /// Priority storage name.
    pub priority: String,
    /// Workflow status storage name.
    pub status: String,
    /// Optional assignee.
    pub assigned_to: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Entity summary JSON payload.
    pub extracted_entities: Value,
    /// Suggested actions JSON payload.
    pub suggested_actions: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset writing only the columns a patch supplied.
///
/// Outer `None` skips a column; `Some(None)` on a nullable column writes an
/// explicit NULL. The update timestamp is always written.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Replacement title, when patched.
    pub title: Option<String>,
    /// Replacement description, when patched.
    pub description: Option<Option<String>>,
    /// Replacement category storage name, when patched.
    pub category: Option<String>,
    /// Replacement priority storage name, when patched.
    pub priority: Option<String>,
    /// Replacement status storage name, when patched.
    pub status: Option<String>,
    /// Replacement assignee, when patched.
    pub assigned_to: Option<Option<String>>,
    /// Replacement due date, when patched.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Refreshed update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for history records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskHistoryRow {
    /// History row identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Mutation kind storage name.
    pub action: String,
    /// Old-values JSON payload, when present.
    pub old_value: Option<Value>,
    /// New-values JSON payload, when present.
    pub new_value: Option<Value>,
    /// Optional actor identifier.
    pub changed_by: Option<String>,
    /// Mutation timestamp.
    pub changed_at: DateTime<Utc>,
}

/// Insert model for history records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_history)]
pub struct NewTaskHistoryRow {
    /// History row identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Mutation kind storage name.
    pub action: String,
    /// Old-values JSON payload, when present.
    pub old_value: Option<Value>,
    /// New-values JSON payload, when present.
    pub new_value: Option<Value>,
    /// Optional actor identifier.
    pub changed_by: Option<String>,
    /// Mutation timestamp.
    pub changed_at: DateTime<Utc>,
}
