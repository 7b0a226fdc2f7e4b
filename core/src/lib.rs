//! # Todo Core
//!
//! Domain types and business rules for the per-user todo service.
//!
//! This crate is the functional core of the service. It owns:
//!
//! - **Types**: the `Todo` record, its enums, filters, patches and request shapes
//! - **Lifecycle**: `TodoService`, the create/read/update/soft-delete state machine
//! - **Ranking**: the urgency score used by the combined "sorted" view
//! - **Statistics**: per-owner tallies by status, priority and overdue condition
//!
//! Persistence is abstracted behind the [`store::TodoStore`] trait and time behind
//! [`environment::Clock`], both injected into the service at construction.
//!
//! ## Example
//!
//! ```ignore
//! use todo_core::{CreateTodo, OwnerId, ServiceConfig, TodoService};
//! use todo_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! let service = TodoService::new(store, Arc::new(SystemClock), ServiceConfig::default());
//!
//! let owner = OwnerId::new("user-1");
//! let todo = service
//!     .create(&owner, CreateTodo {
//!         title: "Write report".to_string(),
//!         description: "Quarterly numbers".to_string(),
//!         priority: None,
//!         deadline: "2025-03-01T12:00:00Z".to_string(),
//!     })
//!     .await?;
//!
//! let ranked = service.ranked(&owner).await?;
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod ranking;
pub mod service;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use config::ServiceConfig;
pub use error::{Result, TodoError};
pub use service::TodoService;
pub use store::TodoStore;
pub use types::{
    Confirmation, CreateTodo, NewTodo, OwnerId, Priority, SortField, SortOrder, SortSpec, Status,
    Todo, TodoFilter, TodoId, TodoPatch, TodoQuery, TodoStats, UpdateTodo,
};
