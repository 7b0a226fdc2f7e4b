//! Todo endpoints.
//!
//! Every handler requires an [`AuthenticatedUser`] and passes its owner id to
//! the lifecycle service; nothing in a request body or query can choose the
//! owner.

use crate::error::AppError;
use crate::extractors::ValidQuery;
use crate::identity::AuthenticatedUser;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use todo_core::{
    Confirmation, CreateTodo, Todo, TodoError, TodoId, TodoQuery, TodoStats, TodoStore,
    UpdateTodo,
};

/// Parse a path id. A malformed id cannot name any todo.
fn todo_id(raw: &str) -> Result<TodoId, AppError> {
    TodoId::parse(raw).ok_or_else(|| TodoError::NotFound.into())
}

/// Create a todo.
///
/// # Endpoint
///
/// ```text
/// POST /api/todos
/// {"title": "...", "description": "...", "priority": "high", "deadline": "2025-03-01T12:00:00Z"}
/// ```
///
/// # Errors
///
/// 400 on malformed JSON; a 400 validation error naming the field when a
/// field is unknown, mistyped or invalid; 401 without a valid token.
pub async fn create_todo<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(owner): AuthenticatedUser,
    body: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Json(request) = body?;
    let todo = state.todos.create(&owner, request).await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// List the caller's todos.
///
/// # Endpoint
///
/// ```text
/// GET /api/todos?status=pending&priority=high&sortBy=deadline&sortOrder=asc
/// ```
///
/// # Errors
///
/// 400 validation error naming an unknown parameter or a bad value.
pub async fn list_todos<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(owner): AuthenticatedUser,
    ValidQuery(query): ValidQuery<TodoQuery>,
) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.todos.list(&owner, &query).await?))
}

/// Counts by status, priority and overdue.
///
/// # Errors
///
/// 500 if the store fails.
pub async fn todo_stats<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(owner): AuthenticatedUser,
) -> Result<Json<TodoStats>, AppError> {
    Ok(Json(state.todos.stats(&owner).await?))
}

/// The caller's todos ordered by urgency.
///
/// # Errors
///
/// 500 if the store fails.
pub async fn ranked_todos<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(owner): AuthenticatedUser,
) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.todos.ranked(&owner).await?))
}

/// Fetch one todo.
///
/// # Errors
///
/// 404 unless the id names a live todo owned by the caller.
pub async fn get_todo<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(owner): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let id = todo_id(&id)?;
    Ok(Json(state.todos.get(id, &owner).await?))
}

/// Partially update one todo.
///
/// # Errors
///
/// 400 on a malformed body or failed validation, 404 as for [`get_todo`].
pub async fn update_todo<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(owner): AuthenticatedUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Json(request) = body?;
    let id = todo_id(&id)?;

    Ok(Json(state.todos.update(id, &owner, request).await?))
}

/// Soft-delete one todo.
///
/// # Errors
///
/// 404 as for [`get_todo`], including a repeated delete.
pub async fn delete_todo<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(owner): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Confirmation>, AppError> {
    let id = todo_id(&id)?;
    Ok(Json(state.todos.soft_delete(id, &owner).await?))
}
