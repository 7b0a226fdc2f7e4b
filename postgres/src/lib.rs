//! `PostgreSQL` todo store for the todo service.
//!
//! This crate provides a production [`TodoStore`](todo_core::TodoStore)
//! backed by a single `todos` table. It uses sqlx runtime queries and supports:
//!
//! - Owner-scoped filtered and sorted reads
//! - Conditional single-row updates that re-check ownership at write time
//! - Statistics computed in SQL with `COUNT(*) FILTER`
//! - Embedded migrations
//!
//! # Example
//!
//! ```no_run
//! use todo_postgres::PostgresTodoStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = sqlx::PgPool::connect("postgres://localhost/todos").await?;
//! let store = PostgresTodoStore::new(pool);
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod store;

pub use store::PostgresTodoStore;
