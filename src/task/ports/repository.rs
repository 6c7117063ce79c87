//! Repository port for task and history persistence.

use crate::task::domain::{Task, TaskHistoryEntry, TaskId, TaskListQuery, TaskPage, TaskPatch};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Implementations persist two collections, tasks and their append-only
/// history, and must remove a task's history rows together with the task
/// (referential cascade).
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Persists an updated task.
    ///
    /// `task` carries the post-update state; `patch` names the fields the
    /// caller supplied, and column-oriented backends write only those plus
    /// the update timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task, patch: &TaskPatch) -> TaskRepositoryResult<()>;

    /// Deletes a task and, by cascade, all of its history rows.
    ///
    /// Deleting a missing task is a no-op; existence checks belong to the
    /// caller.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Returns one page of tasks matching the query, newest creation first,
    /// along with the total matching count.
    async fn list(&self, query: &TaskListQuery) -> TaskRepositoryResult<TaskPage>;

    /// Appends one history entry for an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the referenced task
    /// does not exist.
    async fn append_history(&self, entry: &TaskHistoryEntry) -> TaskRepositoryResult<()>;

    /// Returns all history entries for a task, most recent first.
    ///
    /// A task with no entries (or a missing task) yields an empty list.
    async fn history_for_task(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskHistoryEntry>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
