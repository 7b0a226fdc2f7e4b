//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health. Neither requires authentication.

use crate::state::AppState;
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use todo_core::TodoStore;

/// Store connectivity as seen by the health report.
#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    /// `connected` or `disconnected`
    pub status: &'static str,
    /// Database the store is bound to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Health report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Always `ok` while the process is serving
    pub status: &'static str,
    /// When the report was produced
    pub timestamp: DateTime<Utc>,
    /// Seconds since the router was built
    pub uptime_seconds: u64,
    /// Store connectivity
    pub database: DatabaseHealth,
    /// Service version
    pub version: &'static str,
}

/// Liveness reply.
#[derive(Debug, Serialize)]
pub struct Pong {
    /// Always `pong`
    pub message: &'static str,
    /// When the reply was produced
    pub timestamp: DateTime<Utc>,
}

/// Health report including store connectivity.
///
/// Always 200: a disconnected store is reported in the body, not the status.
///
/// # Endpoint
///
/// ```text
/// GET /api/health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "timestamp": "2025-01-01T00:00:00Z",
///   "uptimeSeconds": 42,
///   "database": { "status": "connected", "name": "todos" },
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_check<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<HealthReport> {
    let database = match state.todos.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the store");
            "disconnected"
        }
    };

    Json(HealthReport {
        status: "ok",
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: DatabaseHealth {
            status: database,
            name: state.todos.store().database_name(),
        },
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Simple liveness check. Does not touch the store.
///
/// # Endpoint
///
/// ```text
/// GET /api/health/ping
/// ```
#[allow(clippy::unused_async)]
pub async fn ping() -> Json<Pong> {
    Json(Pong {
        message: "pong",
        timestamp: Utc::now(),
    })
}
