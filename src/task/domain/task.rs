//! Task aggregate root and its closed classification sets.

use super::{
    FieldDelta, ParseTaskCategoryError, ParseTaskPriorityError, ParseTaskStatusError, Patch,
    TaskId, TaskPatch, TaskTitle,
};
use super::update::{optional_text_value, optional_timestamp_value, text_value};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Pending,
    /// Task is being worked on.
    InProgress,
    /// Task has been completed.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task category assigned by keyword classification at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Meetings, calls, and other calendar work.
    Scheduling,
    /// Payments, invoices, and budget work.
    Finance,
    /// Defects, deployments, and maintenance work.
    Technical,
    /// Inspections, hazards, and compliance work.
    Safety,
    /// Fallback when no category keyword matches.
    General,
}

impl TaskCategory {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduling => "scheduling",
            Self::Finance => "finance",
            Self::Technical => "technical",
            Self::Safety => "safety",
            Self::General => "general",
        }
    }
}

impl TryFrom<&str> for TaskCategory {
    type Error = ParseTaskCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "scheduling" => Ok(Self::Scheduling),
            "finance" => Ok(Self::Finance),
            "technical" => Ok(Self::Technical),
            "safety" => Ok(Self::Safety),
            "general" => Ok(Self::General),
            _ => Err(ParseTaskCategoryError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task urgency assigned by keyword classification at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Fallback when no priority keyword matches.
    Low,
    /// Work expected within the next weeks.
    Medium,
    /// Work that must happen immediately.
    High,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entity summary extracted from the task text at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    /// Category keywords found in the task text, first occurrence first.
    pub keywords: Vec<String>,
    /// Assignee name, when one was supplied and non-empty.
    pub assigned_person: Option<String>,
    /// Character count of the raw `title + " " + description` text.
    pub text_length: usize,
}

/// Parameter object for creating a task from classified input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Validated task title.
    pub title: TaskTitle,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional assignee.
    pub assigned_to: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Category assigned by the classifier.
    pub category: TaskCategory,
    /// Priority assigned by the classifier.
    pub priority: TaskPriority,
    /// Entity summary extracted from the task text.
    pub extracted_entities: ExtractedEntities,
    /// Suggested next actions for the assigned category.
    pub suggested_actions: Vec<String>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted assignee, if any.
    pub assigned_to: Option<String>,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted category.
    pub category: TaskCategory,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted entity summary.
    pub extracted_entities: ExtractedEntities,
    /// Persisted suggested actions.
    pub suggested_actions: Vec<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root.
///
/// Classification output (category, priority, extracted entities, suggested
/// actions) is fixed at creation; [`Task::apply_patch`] overwrites fields a
/// caller explicitly supplies but never re-runs the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    category: TaskCategory,
    priority: TaskPriority,
    status: TaskStatus,
    assigned_to: Option<String>,
    due_date: Option<DateTime<Utc>>,
    extracted_entities: ExtractedEntities,
    suggested_actions: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new pending task from classified input.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            category: data.category,
            priority: data.priority,
            status: TaskStatus::Pending,
            assigned_to: data.assigned_to,
            due_date: data.due_date,
            extracted_entities: data.extracted_entities,
            suggested_actions: data.suggested_actions,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            category: data.category,
            priority: data.priority,
            status: data.status,
            assigned_to: data.assigned_to,
            due_date: data.due_date,
            extracted_entities: data.extracted_entities,
            suggested_actions: data.suggested_actions,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the task category.
    #[must_use]
    pub const fn category(&self) -> TaskCategory {
        self.category
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the task workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the entity summary extracted at creation.
    #[must_use]
    pub const fn extracted_entities(&self) -> &ExtractedEntities {
        &self.extracted_entities
    }

    /// Returns the suggested actions assigned at creation.
    #[must_use]
    pub fn suggested_actions(&self) -> &[String] {
        &self.suggested_actions
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a presence-aware patch and records the field-level diff.
    ///
    /// Every field the patch explicitly sets is overwritten (even when the
    /// new value equals the old one) and captured in the returned
    /// [`FieldDelta`] under its storage name. Omitted fields are untouched.
    /// Returns `None` without mutating the task when the patch sets nothing.
    ///
    /// Classification output is never recomputed here, even when the patch
    /// rewrites the title or description.
    pub fn apply_patch(&mut self, patch: &TaskPatch, clock: &impl Clock) -> Option<FieldDelta> {
        if patch.is_empty() {
            return None;
        }

        let mut delta = FieldDelta::new();
        if let Patch::Set(title) = patch.title() {
            delta.record(
                "title",
                text_value(self.title.as_str()),
                text_value(title.as_str()),
            );
            self.title = title.clone();
        }
        if let Patch::Set(description) = patch.description() {
            delta.record(
                "description",
                optional_text_value(self.description.as_deref()),
                optional_text_value(description.as_deref()),
            );
            self.description.clone_from(description);
        }
        if let Patch::Set(status) = patch.status() {
            delta.record(
                "status",
                text_value(self.status.as_str()),
                text_value(status.as_str()),
            );
            self.status = *status;
        }
        if let Patch::Set(category) = patch.category() {
            delta.record(
                "category",
                text_value(self.category.as_str()),
                text_value(category.as_str()),
            );
            self.category = *category;
        }
        if let Patch::Set(priority) = patch.priority() {
            delta.record(
                "priority",
                text_value(self.priority.as_str()),
                text_value(priority.as_str()),
            );
            self.priority = *priority;
        }
        if let Patch::Set(assigned_to) = patch.assigned_to() {
            delta.record(
                "assigned_to",
                optional_text_value(self.assigned_to.as_deref()),
                optional_text_value(assigned_to.as_deref()),
            );
            self.assigned_to.clone_from(assigned_to);
        }
        if let Patch::Set(due_date) = patch.due_date() {
            delta.record(
                "due_date",
                optional_timestamp_value(self.due_date),
                optional_timestamp_value(*due_date),
            );
            self.due_date = *due_date;
        }

        self.touch(clock);
        Some(delta)
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
