//! Error types for web handlers.
//!
//! [`AppError`] bridges domain and identity errors to HTTP responses with a
//! JSON body of the form `{"code": ..., "message": ..., "field": ...}`.

use crate::identity::IdentityError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_path_to_error::Segment;
use std::fmt;
use todo_core::TodoError;

/// Deserialization failure carrying the path to the offending field.
pub type PathError = serde_path_to_error::Error<serde_json::Error>;

/// Application error type for web handlers.
///
/// Implements Axum's `IntoResponse`, so handlers can return
/// `Result<_, AppError>` and use `?` on domain results.
///
/// # Examples
///
/// ```ignore
/// async fn handler(...) -> Result<Json<Todo>, AppError> {
///     let todo = state.todos.get(id, &owner).await?;
///     Ok(Json(todo))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Offending request field, for validation errors
    field: Option<String>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: &'static str) -> Self {
        Self {
            status,
            message,
            code,
            field: None,
            source: None,
        }
    }

    /// Attach the internal cause. Logged, never sent to the client.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into(), "BAD_REQUEST")
    }

    /// Create a 400 validation error against `field`.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::new(StatusCode::BAD_REQUEST, message.into(), "VALIDATION_ERROR")
        }
    }

    /// Validation error for a request that failed to deserialize, reported
    /// against the first named field on the error's path.
    #[must_use]
    pub fn from_path_error(err: &PathError) -> Self {
        let field = err
            .path()
            .iter()
            .find_map(|segment| match segment {
                Segment::Map { key } => Some(key.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "request".to_string());
        let message = format!("Invalid `{field}`: {}", err.inner());

        Self::validation(field, message)
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into(), "UNAUTHORIZED")
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message.into(), "NOT_FOUND")
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR",
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
            field: self.field,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Validation { field, reason } => {
                Self::validation(field, format!("Invalid `{field}`: {reason}"))
            }
            TodoError::NotFound => Self::not_found("Todo not found"),
            store @ TodoError::Store(_) => {
                Self::internal("An internal error occurred").with_source(store.into())
            }
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        Self::unauthorized(err.to_string())
    }
}

/// Well-formed JSON of the wrong shape is a validation error against the
/// field it names; syntax and content-type failures stay `BAD_REQUEST`.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if let JsonRejection::JsonDataError(data) = &rejection {
            if let Some(err) = find_path_error(data) {
                return Self::from_path_error(err);
            }
        }
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

fn find_path_error<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a PathError> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(found) = err.downcast_ref::<PathError>() {
            return Some(found);
        }
        current = err.source();
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use todo_core::{CreateTodo, UpdateTodo};

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_validation_maps_to_bad_request_with_field() {
        let err = AppError::from(TodoError::validation("deadline", "not a date"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.field.as_deref(), Some("deadline"));
    }

    #[test]
    fn test_not_found() {
        let err = AppError::from(TodoError::NotFound);
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "[NOT_FOUND] Todo not found");
    }

    #[test]
    fn test_store_error_hides_detail() {
        let err = AppError::from(TodoError::Store("connection refused".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("connection refused"));
        assert!(err.source.is_some());
    }

    #[test]
    fn test_identity_error_is_unauthorized() {
        let err = AppError::from(IdentityError::MissingHeader);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "UNAUTHORIZED");
    }

    #[test]
    fn test_json_type_error_names_field() {
        let rejection = Json::<CreateTodo>::from_bytes(br#"{"title":"t","priority":"urgent"}"#)
            .unwrap_err();
        let err = AppError::from(rejection);

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.field.as_deref(), Some("priority"));
        assert!(err.message.contains("urgent"));
    }

    #[test]
    fn test_json_unknown_field_is_named() {
        let rejection =
            Json::<UpdateTodo>::from_bytes(br#"{"completedAt":"2025-01-01"}"#).unwrap_err();
        let err = AppError::from(rejection);

        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.field.as_deref(), Some("completedAt"));
    }

    #[test]
    fn test_json_syntax_error_stays_bad_request() {
        let rejection = Json::<CreateTodo>::from_bytes(b"{\"title\": ").unwrap_err();
        let err = AppError::from(rejection);

        assert_eq!(err.code, "BAD_REQUEST");
        assert_eq!(err.field, None);
    }
}
