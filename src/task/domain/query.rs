//! List queries and pagination results for task collections.

use super::{Task, TaskCategory, TaskPriority, TaskStatus};
use serde::Serialize;

/// Filtered, paginated query over the task collection.
///
/// The limit and offset are normalized at construction so no adapter can be
/// handed a degenerate page: the limit defaults to
/// [`TaskListQuery::DEFAULT_LIMIT`] and is clamped to
/// `[1, TaskListQuery::MAX_LIMIT]`, the offset is floored at zero. Filters
/// are equality checks combined conjunctively; absent filters match
/// everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListQuery {
    limit: i64,
    offset: i64,
    status: Option<TaskStatus>,
    category: Option<TaskCategory>,
    priority: Option<TaskPriority>,
}

impl TaskListQuery {
    /// Page size used when the caller does not supply one.
    pub const DEFAULT_LIMIT: i64 = 10;

    /// Largest allowed page size.
    pub const MAX_LIMIT: i64 = 100;

    /// Creates an unfiltered query for the first default-sized page.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
            status: None,
            category: None,
            priority: None,
        }
    }

    /// Sets the page size, clamped to `[1, MAX_LIMIT]`.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = if limit < 1 {
            1
        } else if limit > Self::MAX_LIMIT {
            Self::MAX_LIMIT
        } else {
            limit
        };
        self
    }

    /// Sets the row offset, floored at zero.
    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = if offset < 0 { 0 } else { offset };
        self
    }

    /// Filters on workflow status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters on category.
    #[must_use]
    pub const fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Filters on priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns the normalized page size.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Returns the normalized row offset.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Returns the status filter, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the category filter, if any.
    #[must_use]
    pub const fn category(&self) -> Option<TaskCategory> {
        self.category
    }

    /// Returns the priority filter, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns `true` when the task passes every active filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self.category.is_none_or(|category| task.category() == category)
            && self.priority.is_none_or(|priority| task.priority() == priority)
    }

    /// One-based page number this query's offset falls on.
    #[must_use]
    pub const fn page_number(&self) -> i64 {
        self.offset.div_euclid(self.limit) + 1
    }
}

impl Default for TaskListQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Pagination summary returned alongside a task page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// One-based page number derived from the query offset.
    pub page: i64,
    /// Normalized page size the query used.
    pub limit: i64,
    /// Total matching rows across all pages.
    pub total: i64,
}

/// One page of tasks plus its pagination summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPage {
    /// Tasks on this page, newest creation first.
    pub tasks: Vec<Task>,
    /// Pagination summary.
    pub pagination: PageInfo,
}
