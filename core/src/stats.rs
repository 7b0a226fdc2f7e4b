//! Per-owner statistics.

use crate::types::{Priority, Status, Todo, TodoStats};
use chrono::{DateTime, Utc};

/// Tally `todos` by status, priority and overdue condition.
///
/// Callers pass an already owner-scoped, non-deleted set. A todo is overdue
/// when it is pending and its deadline lies strictly before `reference`.
#[must_use]
pub fn tally(todos: &[Todo], reference: DateTime<Utc>) -> TodoStats {
    todos.iter().fold(TodoStats::default(), |mut stats, todo| {
        stats.total += 1;

        match todo.status {
            Status::Completed => stats.completed += 1,
            Status::Pending => stats.pending += 1,
        }

        match todo.priority {
            Priority::High => stats.high += 1,
            Priority::Medium => stats.medium += 1,
            Priority::Low => stats.low += 1,
        }

        if todo.is_overdue(reference) {
            stats.overdue += 1;
        }

        stats
    })
}
