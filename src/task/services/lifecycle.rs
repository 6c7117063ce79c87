//! Service layer for task creation, retrieval, update, and deletion.

use crate::task::{
    domain::{
        NewTaskData, Task, TaskDomainError, TaskHistoryEntry, TaskId, TaskListQuery, TaskPage,
        TaskPatch, TaskTitle,
        classification::{classify_category, classify_priority, extract_entities, suggested_actions},
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    assigned_to: Option<String>,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            assigned_to: None,
            due_date: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A task together with its audit history, most recent entry first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskWithHistory {
    /// The task record.
    pub task: Task,
    /// Audit history, ordered by change time descending.
    pub history: Vec<TaskHistoryEntry>,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Classification runs exactly once, inside [`Self::create`]; updates write
/// through without recomputing it. The task write and its paired history
/// write are sequential, not transactional: a crash between the two can
/// leave a task without the matching audit row, an accepted gap.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task, classifying it from its title and description, and
    /// records the creation in the audit history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the title fails
    /// validation and [`TaskLifecycleError::Repository`] when persistence
    /// rejects either write.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let category = classify_category(title.as_str(), request.description.as_deref());
        let priority = classify_priority(title.as_str(), request.description.as_deref());
        let extracted_entities = extract_entities(
            title.as_str(),
            request.description.as_deref(),
            request.assigned_to.as_deref(),
        );
        let actions = suggested_actions(category.as_str())
            .iter()
            .map(|action| (*action).to_owned())
            .collect();

        let task = Task::new(
            NewTaskData {
                title,
                description: request.description,
                assigned_to: request.assigned_to,
                due_date: request.due_date,
                category,
                priority,
                extracted_entities,
                suggested_actions: actions,
            },
            &*self.clock,
        );

        self.repository.insert(&task).await?;
        let entry = TaskHistoryEntry::created_for(&task, &*self.clock);
        self.repository.append_history(&entry).await?;
        Ok(task)
    }

    /// Retrieves a task and its audit history.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn get(&self, id: TaskId) -> TaskLifecycleResult<Option<TaskWithHistory>> {
        let Some(task) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };
        let history = self.repository.history_for_task(id).await?;
        Ok(Some(TaskWithHistory { task, history }))
    }

    /// Applies a partial update and records the field-level diff in the
    /// audit history.
    ///
    /// Returns `Ok(None)` when the task does not exist. A patch that sets
    /// no field performs no write, appends no history, and returns the
    /// stored task unchanged. Classification output is not recomputed, even
    /// when the patch rewrites the title or description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence rejects
    /// either write.
    pub async fn update(
        &self,
        id: TaskId,
        patch: TaskPatch,
    ) -> TaskLifecycleResult<Option<Task>> {
        let Some(mut task) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        let Some(delta) = task.apply_patch(&patch, &*self.clock) else {
            return Ok(Some(task));
        };

        self.repository.update(&task, &patch).await?;
        let entry = TaskHistoryEntry::updated_for(task.id(), delta, &*self.clock);
        self.repository.append_history(&entry).await?;
        Ok(Some(task))
    }

    /// Deletes a task together with its audit history.
    ///
    /// Returns `false` when the task does not exist, `true` after a
    /// successful delete.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence rejects
    /// the lookup or the delete.
    pub async fn delete(&self, id: TaskId) -> TaskLifecycleResult<bool> {
        let Some(_existing) = self.repository.find_by_id(id).await? else {
            return Ok(false);
        };
        self.repository.delete(id).await?;
        Ok(true)
    }

    /// Lists tasks matching the query, newest creation first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence rejects
    /// the query.
    pub async fn list(&self, query: TaskListQuery) -> TaskLifecycleResult<TaskPage> {
        Ok(self.repository.list(&query).await?)
    }
}
