//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints under `/api`.

use crate::handlers::{health, todos};
use crate::state::AppState;
use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::get,
};
use std::sync::Arc;
use std::time::Duration;
use todo_core::TodoStore;
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request budget per client address.
///
/// The whole budget is available at once and refills evenly over `window`,
/// so a client that stays under `requests` per `window` is never throttled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed per window
    pub requests: u32,
    /// Window length
    pub window: Duration,
}

impl RateLimit {
    /// `requests` per `window`.
    #[must_use]
    pub const fn new(requests: u32, window: Duration) -> Self {
        Self { requests, window }
    }

    /// Time to earn back one request.
    fn replenish_period(self) -> Duration {
        (self.window / self.requests.max(1)).max(Duration::from_millis(1))
    }
}

impl Default for RateLimit {
    /// 100 requests per minute.
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

/// Build the complete Axum router.
///
/// Routes:
/// - `POST/GET /api/todos`
/// - `GET /api/todos/stats`, `GET /api/todos/sorted`
/// - `GET/PATCH/DELETE /api/todos/:id`
/// - `GET /api/health`, `GET /api/health/ping` (no authentication)
///
/// Every response carries an `x-request-id`, echoed from the request when
/// present. Clients are keyed by peer address, so the router must be served
/// with `into_make_service_with_connect_info::<SocketAddr>()`; a client over
/// its [`RateLimit`] gets 429.
pub fn build_router<S: TodoStore + 'static>(state: AppState<S>, rate_limit: RateLimit) -> Router {
    let api_routes = Router::new()
        .route(
            "/todos",
            get(todos::list_todos::<S>).post(todos::create_todo::<S>),
        )
        .route("/todos/stats", get(todos::todo_stats::<S>))
        .route("/todos/sorted", get(todos::ranked_todos::<S>))
        .route(
            "/todos/:id",
            get(todos::get_todo::<S>)
                .patch(todos::update_todo::<S>)
                .delete(todos::delete_todo::<S>),
        )
        .route("/health", get(health::health_check::<S>))
        .route("/health/ping", get(health::ping));

    let router = Router::new().nest("/api", api_routes);

    let governor = GovernorConfigBuilder::default()
        .period(rate_limit.replenish_period())
        .burst_size(rate_limit.requests.max(1))
        .finish();
    let router = match governor {
        Some(config) => router.layer(GovernorLayer {
            config: Arc::new(config),
        }),
        None => {
            tracing::warn!(?rate_limit, "Invalid rate limit, serving without one");
            router
        }
    };

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(cors_layer()),
        )
        .with_state(state)
}

/// CORS: reflect the caller's origin and allow credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}
