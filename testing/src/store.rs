//! In-memory todo store for fast, deterministic tests.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned lock

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use todo_core::environment::Clock;
use todo_core::{
    NewTodo, Result, SortSpec, Status, Todo, TodoError, TodoFilter, TodoId, TodoPatch, TodoStore,
};

// Reported as the database name in health checks.
const DATABASE_NAME: &str = "in-memory";

/// `Vec`-backed [`TodoStore`].
///
/// Records are kept in insertion order, so a stable sort leaves ties in
/// insertion order like the PostgreSQL store does. Timestamps come from the
/// injected clock.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use todo_testing::{InMemoryTodoStore, test_clock};
///
/// let store = InMemoryTodoStore::new(Arc::new(test_clock()));
/// assert!(store.is_empty());
/// ```
#[derive(Clone)]
pub struct InMemoryTodoStore {
    todos: Arc<RwLock<Vec<Todo>>>,
    clock: Arc<dyn Clock>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryTodoStore {
    /// Create an empty store stamping records with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            todos: Arc::new(RwLock::new(Vec::new())),
            clock,
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent call fail with [`TodoError::Store`] (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a fully formed record, bypassing validation.
    pub fn seed(&self, todo: Todo) {
        self.todos.write().unwrap().push(todo);
    }

    /// Raw record by id, deleted or not.
    #[must_use]
    pub fn raw(&self, id: TodoId) -> Option<Todo> {
        self.todos
            .read()
            .unwrap()
            .iter()
            .find(|todo| todo.id == id)
            .cloned()
    }

    /// Number of records, including deleted ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.read().unwrap().len()
    }

    /// Whether the store holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.read().unwrap().is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TodoError::Store("in-memory store marked unavailable".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryTodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTodoStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl TodoStore for InMemoryTodoStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo> {
        self.check_available()?;

        let now = self.clock.now();
        let stored = Todo {
            id: TodoId::new(),
            title: todo.title,
            description: todo.description,
            owner_id: todo.owner_id,
            priority: todo.priority,
            status: Status::Pending,
            deadline: todo.deadline,
            completed_at: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        self.todos.write().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_one(&self, filter: &TodoFilter) -> Result<Option<Todo>> {
        self.check_available()?;

        Ok(self
            .todos
            .read()
            .unwrap()
            .iter()
            .find(|todo| filter.matches(todo))
            .cloned())
    }

    async fn find(&self, filter: &TodoFilter, sort: SortSpec) -> Result<Vec<Todo>> {
        self.check_available()?;

        let mut found: Vec<Todo> = self
            .todos
            .read()
            .unwrap()
            .iter()
            .filter(|todo| filter.matches(todo))
            .cloned()
            .collect();

        found.sort_by(|a, b| sort.compare(a, b));
        Ok(found)
    }

    async fn update_one(&self, filter: &TodoFilter, patch: &TodoPatch) -> Result<Option<Todo>> {
        self.check_available()?;

        let now = self.clock.now();
        let mut todos = self.todos.write().unwrap();

        Ok(todos.iter_mut().find(|todo| filter.matches(todo)).map(|todo| {
            patch.apply(todo);
            todo.updated_at = now;
            todo.clone()
        }))
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }

    fn database_name(&self) -> Option<String> {
        Some(DATABASE_NAME.to_string())
    }
}
