//! Audit history entries for task creation and update events.
//!
//! Every mutation of a task appends exactly one immutable history row.
//! Creation snapshots the classified headline fields; updates carry the
//! field-level before/after diff of exactly the fields the caller supplied.

use super::update::text_value;
use super::{FieldDelta, HistoryId, ParseHistoryActionError, Task, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Map of field storage names to recorded JSON values.
pub type FieldValues = serde_json::Map<String, Value>;

/// Kind of mutation a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// The task was created.
    Created,
    /// One or more task fields were updated.
    Updated,
}

impl HistoryAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

impl TryFrom<&str> for HistoryAction {
    type Error = ParseHistoryActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            _ => Err(ParseHistoryActionError(value.to_owned())),
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted history identifier.
    pub id: HistoryId,
    /// Task the entry belongs to.
    pub task_id: TaskId,
    /// Recorded mutation kind.
    pub action: HistoryAction,
    /// Recorded old values, when the action carries them.
    pub old_value: Option<FieldValues>,
    /// Recorded new values, when the action carries them.
    pub new_value: Option<FieldValues>,
    /// Actor that performed the mutation, if known.
    pub changed_by: Option<String>,
    /// Timestamp of the mutation.
    pub changed_at: DateTime<Utc>,
}

/// Immutable audit record of one task creation or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistoryEntry {
    id: HistoryId,
    task_id: TaskId,
    action: HistoryAction,
    old_value: Option<FieldValues>,
    new_value: Option<FieldValues>,
    changed_by: Option<String>,
    changed_at: DateTime<Utc>,
}

impl TaskHistoryEntry {
    /// Builds the creation entry for a freshly created task.
    ///
    /// The new-value map snapshots the headline fields (title, category,
    /// priority, status); there is no old value for a creation.
    #[must_use]
    pub fn created_for(task: &Task, clock: &impl Clock) -> Self {
        let mut snapshot = FieldValues::new();
        snapshot.insert("title".to_owned(), text_value(task.title().as_str()));
        snapshot.insert("category".to_owned(), text_value(task.category().as_str()));
        snapshot.insert("priority".to_owned(), text_value(task.priority().as_str()));
        snapshot.insert("status".to_owned(), text_value(task.status().as_str()));

        Self {
            id: HistoryId::new(),
            task_id: task.id(),
            action: HistoryAction::Created,
            old_value: None,
            new_value: Some(snapshot),
            changed_by: None,
            changed_at: clock.utc(),
        }
    }

    /// Builds the update entry for an applied field diff.
    #[must_use]
    pub fn updated_for(task_id: TaskId, delta: FieldDelta, clock: &impl Clock) -> Self {
        let (old_values, new_values) = delta.into_parts();
        Self {
            id: HistoryId::new(),
            task_id,
            action: HistoryAction::Updated,
            old_value: Some(old_values),
            new_value: Some(new_values),
            changed_by: None,
            changed_at: clock.utc(),
        }
    }

    /// Reconstructs a history entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            action: data.action,
            old_value: data.old_value,
            new_value: data.new_value,
            changed_by: data.changed_by,
            changed_at: data.changed_at,
        }
    }

    /// Returns the history identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryId {
        self.id
    }

    /// Returns the task this entry belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the recorded mutation kind.
    #[must_use]
    pub const fn action(&self) -> HistoryAction {
        self.action
    }

    /// Returns the recorded old values, when the action carries them.
    #[must_use]
    pub const fn old_value(&self) -> Option<&FieldValues> {
        self.old_value.as_ref()
    }

    /// Returns the recorded new values, when the action carries them.
    #[must_use]
    pub const fn new_value(&self) -> Option<&FieldValues> {
        self.new_value.as_ref()
    }

    /// Returns the actor that performed the mutation, if known.
    ///
    /// The lifecycle service records no actor identity; the field exists in
    /// the persisted shape for surfaces that do.
    #[must_use]
    pub fn changed_by(&self) -> Option<&str> {
        self.changed_by.as_deref()
    }

    /// Returns the mutation timestamp.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }
}
