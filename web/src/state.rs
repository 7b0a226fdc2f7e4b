//! Application state for Axum handlers.

use crate::identity::JwtVerifier;
use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;
use todo_core::{TodoService, TodoStore};

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply, via `Arc`) for each request.
pub struct AppState<S> {
    /// Lifecycle service over the configured store
    pub todos: Arc<TodoService<S>>,

    /// Bearer token verifier
    pub identity: Arc<JwtVerifier>,

    /// When the process started serving, for the health report
    pub started_at: Instant,
}

impl<S: TodoStore> AppState<S> {
    /// Create a new application state.
    #[must_use]
    pub fn new(todos: TodoService<S>, identity: JwtVerifier) -> Self {
        Self {
            todos: Arc::new(todos),
            identity: Arc::new(identity),
            started_at: Instant::now(),
        }
    }
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            todos: Arc::clone(&self.todos),
            identity: Arc::clone(&self.identity),
            started_at: self.started_at,
        }
    }
}

impl<S> FromRef<AppState<S>> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState<S>) -> Self {
        Arc::clone(&state.identity)
    }
}
