//! Custom Axum extractors.
//!
//! - `ValidQuery`: query string deserialized with the failing field reported
//!
//! # Examples
//!
//! ```ignore
//! use todo_web::extractors::ValidQuery;
//!
//! async fn handler(ValidQuery(query): ValidQuery<TodoQuery>) -> Result<Json<Vec<Todo>>, AppError> {
//!     // ...
//! }
//! ```

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Query string parameters as `T`.
///
/// Like [`Query`], but a parameter that is unknown or has the wrong value is
/// a validation error naming that parameter rather than a bare 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<BTreeMap<String, String>>::from_request_parts(parts, state).await?;

        let object: Map<String, Value> = pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        serde_path_to_error::deserialize(Value::Object(object))
            .map(Self)
            .map_err(|e| AppError::from_path_error(&e))
    }
}
