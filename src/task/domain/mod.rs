//! Domain model for the task-management core.
//!
//! The task domain models classified task records, presence-aware partial
//! updates, audit history entries, and list queries while keeping all
//! infrastructure concerns outside of the domain boundary. Classification
//! is a pure function of the task text and runs exactly once, at creation.

pub mod classification;
mod error;
mod history;
mod ids;
mod query;
mod task;
mod update;

pub use error::{
    ParseHistoryActionError, ParseTaskCategoryError, ParseTaskPriorityError, ParseTaskStatusError,
    TaskDomainError,
};
pub use history::{FieldValues, HistoryAction, PersistedHistoryData, TaskHistoryEntry};
pub use ids::{HistoryId, TaskId, TaskTitle};
pub use query::{PageInfo, TaskListQuery, TaskPage};
pub use task::{
    ExtractedEntities, NewTaskData, PersistedTaskData, Task, TaskCategory, TaskPriority,
    TaskStatus,
};
pub use update::{FieldDelta, Patch, TaskPatch};
