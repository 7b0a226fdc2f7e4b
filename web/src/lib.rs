//! Axum HTTP surface for the todo service.
//!
//! This crate is the imperative shell around `todo-core`: it verifies the
//! caller, parses requests, calls [`TodoService`](todo_core::TodoService) and
//! maps results to HTTP responses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, CORS
//! │  - Bearer token verification            │  ← Request ids, tracing
//! │  - Request parsing / error mapping      │  ← Per-client rate limit
//! ├─────────────────────────────────────────┤
//! │         Functional Core (todo-core)     │
//! │  - Lifecycle rules, validation          │  ← Testable in memory
//! │  - Ranking and statistics               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Verify** the bearer token and extract the owner id
//! 3. **Extract** the JSON body or query string; a bad field is a 400 naming it
//! 4. **Call** the lifecycle service with the owner id
//! 5. **Map** the result or [`TodoError`](todo_core::TodoError) to a response
//!
//! # Example
//!
//! ```ignore
//! use std::net::SocketAddr;
//! use todo_web::{AppState, JwtVerifier, RateLimit, build_router};
//!
//! let state = AppState::new(service, JwtVerifier::new(secret.as_bytes(), 60));
//! let app = build_router(state, RateLimit::default());
//! axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use identity::{AuthenticatedUser, BearerToken, Claims, IdentityError, JwtVerifier};
pub use extractors::ValidQuery;
pub use router::{REQUEST_ID_HEADER, RateLimit, build_router};
pub use state::AppState;
