//! Presence-aware partial updates and field-level diffs.
//!
//! A PATCH-style caller must be able to distinguish "field omitted" from
//! "field explicitly set to null". [`Patch`] makes that distinction a type:
//! nullable task fields are patched with `Patch<Option<_>>`, where
//! `Set(None)` clears the stored value and `Keep` leaves it alone.

use super::{FieldValues, TaskCategory, TaskPriority, TaskStatus, TaskTitle};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// One field position in a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    /// The caller omitted the field; the stored value is untouched.
    Keep,
    /// The caller explicitly supplied a value (possibly a null one).
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> Patch<T> {
    /// Returns `true` when the caller supplied a value for this field.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }
}

/// Partial update over the recognized mutable task fields.
///
/// Built with the `with_*` setters; every field left untouched defaults to
/// [`Patch::Keep`]. Note that `category` and `priority` patches overwrite
/// the classifier's output: classification runs only at creation and an
/// explicit patch is the single way these fields change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    title: Patch<TaskTitle>,
    description: Patch<Option<String>>,
    status: Patch<TaskStatus>,
    category: Patch<TaskCategory>,
    priority: Patch<TaskPriority>,
    assigned_to: Patch<Option<String>>,
    due_date: Patch<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    /// Creates a patch that sets nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: TaskTitle) -> Self {
        self.title = Patch::Set(title);
        self
    }

    /// Sets or clears the description; `None` stores an explicit null.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Patch::Set(description);
        self
    }

    /// Sets the workflow status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Patch::Set(status);
        self
    }

    /// Sets the category.
    #[must_use]
    pub const fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Patch::Set(category);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Patch::Set(priority);
        self
    }

    /// Sets or clears the assignee; `None` stores an explicit null.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: Option<String>) -> Self {
        self.assigned_to = Patch::Set(assigned_to);
        self
    }

    /// Sets or clears the due date; `None` stores an explicit null.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Patch::Set(due_date);
        self
    }

    /// Returns the title position.
    #[must_use]
    pub const fn title(&self) -> &Patch<TaskTitle> {
        &self.title
    }

    /// Returns the description position.
    #[must_use]
    pub const fn description(&self) -> &Patch<Option<String>> {
        &self.description
    }

    /// Returns the status position.
    #[must_use]
    pub const fn status(&self) -> &Patch<TaskStatus> {
        &self.status
    }

    /// Returns the category position.
    #[must_use]
    pub const fn category(&self) -> &Patch<TaskCategory> {
        &self.category
    }

    /// Returns the priority position.
    #[must_use]
    pub const fn priority(&self) -> &Patch<TaskPriority> {
        &self.priority
    }

    /// Returns the assignee position.
    #[must_use]
    pub const fn assigned_to(&self) -> &Patch<Option<String>> {
        &self.assigned_to
    }

    /// Returns the due-date position.
    #[must_use]
    pub const fn due_date(&self) -> &Patch<Option<DateTime<Utc>>> {
        &self.due_date
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.title.is_set()
            || self.description.is_set()
            || self.status.is_set()
            || self.category.is_set()
            || self.priority.is_set()
            || self.assigned_to.is_set()
            || self.due_date.is_set())
    }
}

/// Field-level before/after diff produced by applying a patch.
///
/// Both maps hold exactly the fields the patch explicitly set, keyed by
/// their storage names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDelta {
    old_values: FieldValues,
    new_values: FieldValues,
}

impl FieldDelta {
    /// Creates an empty diff.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one field's before/after pair.
    pub fn record(&mut self, field: &str, old: Value, new: Value) {
        self.old_values.insert(field.to_owned(), old);
        self.new_values.insert(field.to_owned(), new);
    }

    /// Returns the old-value map.
    #[must_use]
    pub const fn old_values(&self) -> &FieldValues {
        &self.old_values
    }

    /// Returns the new-value map.
    #[must_use]
    pub const fn new_values(&self) -> &FieldValues {
        &self.new_values
    }

    /// Consumes the diff into its old- and new-value maps.
    #[must_use]
    pub fn into_parts(self) -> (FieldValues, FieldValues) {
        (self.old_values, self.new_values)
    }
}

/// JSON value for a required text field.
pub(super) fn text_value(value: &str) -> Value {
    Value::String(value.to_owned())
}

/// JSON value for a nullable text field.
pub(super) fn optional_text_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text_value)
}

/// JSON value for a nullable timestamp field, RFC 3339 at microsecond
/// precision (the persisted `timestamptz` resolution).
pub(super) fn optional_timestamp_value(value: Option<DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, |timestamp| {
        Value::String(timestamp.to_rfc3339_opts(SecondsFormat::Micros, true))
    })
}
