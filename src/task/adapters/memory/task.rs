//! Thread-safe in-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{PageInfo, Task, TaskHistoryEntry, TaskId, TaskListQuery, TaskPage, TaskPatch},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Stores whole aggregates; the patch column set passed to
/// [`TaskRepository::update`] only matters to column-oriented backends.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    history: HashMap<TaskId, Vec<TaskHistoryEntry>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Converts a normalized query bound to a slice position.
fn slice_position(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn update(&self, task: &Task, _patch: &TaskPatch) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.tasks.remove(&id);
        // Mirrors the SQL schema's ON DELETE CASCADE.
        state.history.remove(&id);
        Ok(())
    }

    async fn list(&self, query: &TaskListQuery) -> TaskRepositoryResult<TaskPage> {
        let state = self.state.read().map_err(lock_error)?;
        let mut matching: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        let tasks: Vec<Task> = matching
            .into_iter()
            .skip(slice_position(query.offset()))
            .take(slice_position(query.limit()))
            .collect();

        Ok(TaskPage {
            tasks,
            pagination: PageInfo {
                page: query.page_number(),
                limit: query.limit(),
                total,
            },
        })
    }

    async fn append_history(&self, entry: &TaskHistoryEntry) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        // Mirrors the SQL schema's foreign key: no history for absent tasks.
        if !state.tasks.contains_key(&entry.task_id()) {
            return Err(TaskRepositoryError::NotFound(entry.task_id()));
        }
        state
            .history
            .entry(entry.task_id())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn history_for_task(
        &self,
        task_id: TaskId,
    ) -> TaskRepositoryResult<Vec<TaskHistoryEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut entries = state.history.get(&task_id).cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.changed_at().cmp(&a.changed_at()));
        Ok(entries)
    }
}
