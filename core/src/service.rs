//! Todo lifecycle service.
//!
//! Owns the create/read/update/soft-delete transitions and delegates the
//! derived read views to [`ranking`](crate::ranking) and the store's
//! aggregation. Every operation is scoped to the caller's [`OwnerId`].

use crate::config::ServiceConfig;
use crate::environment::Clock;
use crate::error::{Result, TodoError};
use crate::ranking;
use crate::store::TodoStore;
use crate::types::{
    Confirmation, CreateTodo, OwnerId, SortSpec, Status, Todo, TodoFilter, TodoId, TodoPatch,
    TodoQuery, TodoStats, UpdateTodo,
};
use crate::validation;
use std::sync::Arc;

/// Confirmation text returned by [`TodoService::soft_delete`].
pub const DELETED_MESSAGE: &str = "Todo deleted successfully";

/// Business rules around a [`TodoStore`].
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct TodoService<S> {
    store: S,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl<S: TodoStore> TodoService<S> {
    /// Create a service over `store`, reading time from `clock`.
    #[must_use]
    pub fn new(store: S, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validate and persist a new todo for `owner`.
    ///
    /// # Errors
    ///
    /// - [`TodoError::Validation`] on empty title/description or an unparseable deadline
    /// - [`TodoError::Store`] if the insert fails
    pub async fn create(&self, owner: &OwnerId, request: CreateTodo) -> Result<Todo> {
        let new = validation::validate_create(owner, request, &self.config)?;
        let todo = self.store.insert(new).await?;

        tracing::info!(todo_id = %todo.id, owner_id = %owner, "Todo created");
        metrics::counter!("todo.created").increment(1);

        Ok(todo)
    }

    /// Fetch one of `owner`'s todos.
    ///
    /// # Errors
    ///
    /// - [`TodoError::NotFound`] if no non-deleted todo with `id` belongs to `owner`
    /// - [`TodoError::Store`] if the lookup fails
    pub async fn get(&self, id: TodoId, owner: &OwnerId) -> Result<Todo> {
        self.store
            .find_one(&Self::scope(id, owner))
            .await?
            .ok_or(TodoError::NotFound)
    }

    /// List `owner`'s todos, filtered and sorted per `query`.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the query fails.
    pub async fn list(&self, owner: &OwnerId, query: &TodoQuery) -> Result<Vec<Todo>> {
        let filter = TodoFilter::for_owner(owner.clone())
            .with_status(query.status)
            .with_priority(query.priority);

        self.store.find(&filter, query.sort_spec()).await
    }

    /// Apply a partial update to one of `owner`'s todos.
    ///
    /// Input is validated before the record is looked up, so a rejected
    /// request never touches the store. Moving to `completed` from any other
    /// status stamps `completed_at`; moving to `pending` clears it.
    ///
    /// # Errors
    ///
    /// - [`TodoError::Validation`] if a present field is invalid
    /// - [`TodoError::NotFound`] under the same ownership rule as [`get`](Self::get)
    /// - [`TodoError::Store`] if the read or write fails
    pub async fn update(&self, id: TodoId, owner: &OwnerId, request: UpdateTodo) -> Result<Todo> {
        let mut patch = validation::validate_update(request, &self.config)?;
        let current = self.get(id, owner).await?;

        patch.completed_at = match patch.status {
            Some(Status::Completed) if current.status != Status::Completed => {
                Some(Some(self.clock.now()))
            }
            Some(Status::Pending) => Some(None),
            _ => None,
        };
        let completing = matches!(patch.completed_at, Some(Some(_)));

        let updated = self
            .store
            .update_one(&Self::scope(id, owner), &patch)
            .await?
            .ok_or(TodoError::NotFound)?;

        tracing::info!(todo_id = %id, owner_id = %owner, status = %updated.status, "Todo updated");
        if completing {
            metrics::counter!("todo.completed").increment(1);
        }

        Ok(updated)
    }

    /// Mark one of `owner`'s todos as deleted.
    ///
    /// Not idempotent: a second call reports [`TodoError::NotFound`].
    ///
    /// # Errors
    ///
    /// - [`TodoError::NotFound`] under the same ownership rule as [`get`](Self::get)
    /// - [`TodoError::Store`] if the read or write fails
    pub async fn soft_delete(&self, id: TodoId, owner: &OwnerId) -> Result<Confirmation> {
        let filter = Self::scope(id, owner);

        if self.store.find_one(&filter).await?.is_none() {
            return Err(TodoError::NotFound);
        }

        self.store
            .update_one(&filter, &TodoPatch::soft_delete())
            .await?
            .ok_or(TodoError::NotFound)?;

        tracing::info!(todo_id = %id, owner_id = %owner, "Todo deleted");
        metrics::counter!("todo.deleted").increment(1);

        Ok(Confirmation {
            message: DELETED_MESSAGE.to_string(),
        })
    }

    /// Counts over `owner`'s todos, overdue measured at the current instant.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the aggregation fails.
    pub async fn stats(&self, owner: &OwnerId) -> Result<TodoStats> {
        let filter = TodoFilter::for_owner(owner.clone());
        self.store.aggregate(&filter, self.clock.now()).await
    }

    /// `owner`'s todos ordered by urgency.
    ///
    /// Input to the ranking is in insertion order, so equal scores list the
    /// older todo first.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the query fails.
    pub async fn ranked(&self, owner: &OwnerId) -> Result<Vec<Todo>> {
        let filter = TodoFilter::for_owner(owner.clone());
        let todos = self.store.find(&filter, SortSpec::oldest_first()).await?;

        tracing::debug!(owner_id = %owner, count = todos.len(), "Ranking todos");

        Ok(ranking::rank(todos, self.clock.now()))
    }

    /// Check the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] when it is not.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    fn scope(id: TodoId, owner: &OwnerId) -> TodoFilter {
        TodoFilter::for_owner(owner.clone()).with_id(id)
    }
}
