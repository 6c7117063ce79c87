//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskHistoryRow, NewTaskRow, TaskChangeset, TaskHistoryRow, TaskRow},
    schema::{task_history, tasks},
};
use crate::task::{
    domain::{
        ExtractedEntities, FieldValues, HistoryAction, HistoryId, PageInfo, Patch,
        PersistedHistoryData, PersistedTaskData, Task, TaskCategory, TaskHistoryEntry, TaskId,
        TaskListQuery, TaskPage, TaskPatch, TaskPriority, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// All Diesel work runs on the blocking thread pool; history cascade
/// deletion is delegated to the schema's `ON DELETE CASCADE` constraint.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn update(&self, task: &Task, patch: &TaskPatch) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = changeset_from(task, patch);

        self.run_blocking(move |connection| {
            let updated_rows =
                diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                    .set(&changeset)
                    .execute(connection)
                    .map_err(TaskRepositoryError::persistence)?;
            if updated_rows == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            // History rows go with the task via ON DELETE CASCADE.
            diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn list(&self, query: &TaskListQuery) -> TaskRepositoryResult<TaskPage> {
        let list_query = query.clone();
        self.run_blocking(move |connection| {
            let total = apply_filters(tasks::table.count().into_boxed::<Pg>(), &list_query)
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;

            let rows = apply_filters(
                tasks::table.select(TaskRow::as_select()).into_boxed::<Pg>(),
                &list_query,
            )
            .order(tasks::created_at.desc())
            .limit(list_query.limit())
            .offset(list_query.offset())
            .load::<TaskRow>(connection)
            .map_err(TaskRepositoryError::persistence)?;

            let tasks = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<Task>>>()?;

            Ok(TaskPage {
                tasks,
                pagination: PageInfo {
                    page: list_query.page_number(),
                    limit: list_query.limit(),
                    total,
                },
            })
        })
        .await
    }

    async fn append_history(&self, entry: &TaskHistoryEntry) -> TaskRepositoryResult<()> {
        let task_id = entry.task_id();
        let new_row = to_new_history_row(entry);

        self.run_blocking(move |connection| {
            diesel::insert_into(task_history::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskRepositoryError::NotFound(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn history_for_task(
        &self,
        task_id: TaskId,
    ) -> TaskRepositoryResult<Vec<TaskHistoryEntry>> {
        self.run_blocking(move |connection| {
            let rows = task_history::table
                .filter(task_history::task_id.eq(task_id.into_inner()))
                .order(task_history::changed_at.desc())
                .select(TaskHistoryRow::as_select())
                .load::<TaskHistoryRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_history).collect()
        })
        .await
    }
}

/// Applies the query's equality filters to a boxed statement.
fn apply_filters<ST>(
    mut statement: tasks::BoxedQuery<'static, Pg, ST>,
    query: &TaskListQuery,
) -> tasks::BoxedQuery<'static, Pg, ST> {
    if let Some(status) = query.status() {
        statement = statement.filter(tasks::status.eq(status.as_str()));
    }
    if let Some(category) = query.category() {
        statement = statement.filter(tasks::category.eq(category.as_str()));
    }
    if let Some(priority) = query.priority() {
        statement = statement.filter(tasks::priority.eq(priority.as_str()));
    }
    statement
}

/// Extracts the value a patch position sets, converted for storage.
fn patched<T, U>(patch: &Patch<T>, convert: impl FnOnce(&T) -> U) -> Option<U> {
    match patch {
        Patch::Set(value) => Some(convert(value)),
        Patch::Keep => None,
    }
}

fn changeset_from(task: &Task, patch: &TaskPatch) -> TaskChangeset {
    TaskChangeset {
        title: patched(patch.title(), |title| title.as_str().to_owned()),
        description: patched(patch.description(), Clone::clone),
        category: patched(patch.category(), |category| category.as_str().to_owned()),
        priority: patched(patch.priority(), |priority| priority.as_str().to_owned()),
        status: patched(patch.status(), |status| status.as_str().to_owned()),
        assigned_to: patched(patch.assigned_to(), Clone::clone),
        due_date: patched(patch.due_date(), |due_date| *due_date),
        updated_at: task.updated_at(),
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let extracted_entities = serde_json::to_value(task.extracted_entities())
        .map_err(TaskRepositoryError::persistence)?;
    let suggested_actions = serde_json::to_value(task.suggested_actions())
        .map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        category: task.category().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        assigned_to: task.assigned_to().map(str::to_owned),
        due_date: task.due_date(),
        extracted_entities,
        suggested_actions,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let title = TaskTitle::new(row.title).map_err(TaskRepositoryError::persistence)?;
    let category = TaskCategory::try_from(row.category.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(row.priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let extracted_entities = serde_json::from_value::<ExtractedEntities>(row.extracted_entities)
        .map_err(TaskRepositoryError::persistence)?;
    let suggested_actions = serde_json::from_value::<Vec<String>>(row.suggested_actions)
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title,
        description: row.description,
        assigned_to: row.assigned_to,
        due_date: row.due_date,
        category,
        priority,
        status,
        extracted_entities,
        suggested_actions,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn to_new_history_row(entry: &TaskHistoryEntry) -> NewTaskHistoryRow {
    NewTaskHistoryRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        action: entry.action().as_str().to_owned(),
        old_value: entry.old_value().cloned().map(Value::Object),
        new_value: entry.new_value().cloned().map(Value::Object),
        changed_by: entry.changed_by().map(str::to_owned),
        changed_at: entry.changed_at(),
    }
}

fn row_to_history(row: TaskHistoryRow) -> TaskRepositoryResult<TaskHistoryEntry> {
    let action =
        HistoryAction::try_from(row.action.as_str()).map_err(TaskRepositoryError::persistence)?;
    let old_value = row.old_value.map(value_to_field_map).transpose()?;
    let new_value = row.new_value.map(value_to_field_map).transpose()?;

    Ok(TaskHistoryEntry::from_persisted(PersistedHistoryData {
        id: HistoryId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        action,
        old_value,
        new_value,
        changed_by: row.changed_by,
        changed_at: row.changed_at,
    }))
}

fn value_to_field_map(value: Value) -> TaskRepositoryResult<FieldValues> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(TaskRepositoryError::persistence(std::io::Error::other(
            "history value column is not a JSON object",
        ))),
    }
}
