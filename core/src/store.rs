//! Record store abstraction.
//!
//! The lifecycle service depends only on this trait. Implementations:
//!
//! - `PostgresTodoStore` (todo-postgres) for production
//! - `InMemoryTodoStore` (todo-testing) for fast tests
//!
//! Every read and write is owner-scoped through [`TodoFilter`], and deleted
//! records are invisible to all of them.

use crate::error::Result;
use crate::stats;
use crate::types::{NewTodo, SortSpec, Todo, TodoFilter, TodoPatch, TodoStats};
use chrono::{DateTime, Utc};

/// Persistence for todo records.
///
/// Implementations must assign `id`, `created_at` and `updated_at` on insert,
/// refresh `updated_at` on every successful `update_one`, and keep sorts stable
/// (ties in insertion order).
pub trait TodoStore: Send + Sync {
    /// Persist a new todo and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`](crate::TodoError::Store) if the write fails.
    fn insert(&self, todo: NewTodo) -> impl std::future::Future<Output = Result<Todo>> + Send;

    /// The first record matching `filter`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`](crate::TodoError::Store) if the read fails.
    fn find_one(
        &self,
        filter: &TodoFilter,
    ) -> impl std::future::Future<Output = Result<Option<Todo>>> + Send;

    /// All records matching `filter`, ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`](crate::TodoError::Store) if the read fails.
    fn find(
        &self,
        filter: &TodoFilter,
        sort: SortSpec,
    ) -> impl std::future::Future<Output = Result<Vec<Todo>>> + Send;

    /// Apply `patch` to the first record matching `filter` and return it as
    /// stored afterwards. `None` when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`](crate::TodoError::Store) if the write fails.
    fn update_one(
        &self,
        filter: &TodoFilter,
        patch: &TodoPatch,
    ) -> impl std::future::Future<Output = Result<Option<Todo>>> + Send;

    /// Count records matching `filter`, with overdue measured against `reference`.
    ///
    /// The default scans [`find`](Self::find); stores that can count natively
    /// should override it.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`](crate::TodoError::Store) if the read fails.
    fn aggregate(
        &self,
        filter: &TodoFilter,
        reference: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<TodoStats>> + Send {
        async move {
            let todos = self.find(filter, SortSpec::oldest_first()).await?;
            Ok(stats::tally(&todos, reference))
        }
    }

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`](crate::TodoError::Store) when it is not.
    fn ping(&self) -> impl std::future::Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    /// Name of the database behind the store, for the health report.
    fn database_name(&self) -> Option<String> {
        None
    }
}
