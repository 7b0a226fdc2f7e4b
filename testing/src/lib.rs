//! # Todo Testing
//!
//! Testing utilities for the todo service.
//!
//! This crate provides:
//! - Deterministic clocks implementing [`Clock`]
//! - [`InMemoryTodoStore`], a `Vec`-backed [`TodoStore`](todo_core::TodoStore)
//! - Fixture builders for requests and records
//! - proptest strategies for domain types
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use todo_core::{OwnerId, ServiceConfig, TodoService};
//! use todo_testing::{InMemoryTodoStore, helpers, test_clock};
//!
//! # tokio_test_block_on(async {
//! let clock = Arc::new(test_clock());
//! let service = TodoService::new(
//!     InMemoryTodoStore::new(clock.clone()),
//!     clock,
//!     ServiceConfig::default(),
//! );
//!
//! let owner = OwnerId::new("alice");
//! let todo = service
//!     .create(&owner, helpers::create_request("Write report"))
//!     .await
//!     .unwrap();
//! assert_eq!(service.get(todo.id, &owner).await.unwrap(), todo);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use chrono::{DateTime, Utc};
use todo_core::environment::Clock;

mod store;

pub use store::InMemoryTodoStore;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration;
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_testing::mocks::FixedClock;
    /// use todo_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Lets a test give successive writes distinct timestamps.
    #[derive(Debug)]
    pub struct ManualClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Start the clock at `time`.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward by `by`.
        ///
        /// # Panics
        ///
        /// Panics if the internal lock is poisoned.
        #[allow(clippy::unwrap_used)]
        pub fn advance(&self, by: Duration) {
            let mut time = self.time.lock().unwrap();
            *time += by;
        }
    }

    impl Clock for ManualClock {
        #[allow(clippy::unwrap_used)]
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap()
        }
    }

    /// The instant every test clock starts at (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_instant() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_instant())
    }
}

/// Fixture builders.
pub mod helpers {
    use super::{DateTime, Utc};
    use chrono::Duration;
    use todo_core::{CreateTodo, OwnerId, Priority, Status, Todo, TodoId, UpdateTodo};

    /// A valid create request due one week after the test instant.
    #[must_use]
    pub fn create_request(title: &str) -> CreateTodo {
        CreateTodo {
            title: title.to_string(),
            description: format!("{title} details"),
            priority: None,
            deadline: (super::mocks::test_instant() + Duration::days(7)).to_rfc3339(),
        }
    }

    /// A valid create request with explicit priority and deadline.
    #[must_use]
    pub fn create_request_due(
        title: &str,
        priority: Priority,
        deadline: DateTime<Utc>,
    ) -> CreateTodo {
        CreateTodo {
            priority: Some(priority),
            deadline: deadline.to_rfc3339(),
            ..create_request(title)
        }
    }

    /// An update that only changes status.
    #[must_use]
    pub fn set_status(status: Status) -> UpdateTodo {
        UpdateTodo {
            status: Some(status),
            ..UpdateTodo::default()
        }
    }

    /// Builder for stored [`Todo`] records, for tests that bypass the service.
    #[derive(Debug, Clone)]
    pub struct TodoBuilder {
        todo: Todo,
    }

    impl TodoBuilder {
        /// A pending, medium-priority todo owned by `owner`, created at the test instant.
        #[must_use]
        pub fn new(owner: &str) -> Self {
            let at = super::mocks::test_instant();
            Self {
                todo: Todo {
                    id: TodoId::new(),
                    title: "Todo".to_string(),
                    description: "Something to do".to_string(),
                    owner_id: OwnerId::new(owner),
                    priority: Priority::Medium,
                    status: Status::Pending,
                    deadline: at + Duration::days(1),
                    completed_at: None,
                    is_deleted: false,
                    created_at: at,
                    updated_at: at,
                },
            }
        }

        /// Set the title.
        #[must_use]
        pub fn title(mut self, title: &str) -> Self {
            self.todo.title = title.to_string();
            self
        }

        /// Set the priority.
        #[must_use]
        pub fn priority(mut self, priority: Priority) -> Self {
            self.todo.priority = priority;
            self
        }

        /// Set the status.
        #[must_use]
        pub fn status(mut self, status: Status) -> Self {
            self.todo.status = status;
            self
        }

        /// Set the deadline.
        #[must_use]
        pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
            self.todo.deadline = deadline;
            self
        }

        /// Mark as deleted.
        #[must_use]
        pub fn deleted(mut self) -> Self {
            self.todo.is_deleted = true;
            self
        }

        /// Finish.
        #[must_use]
        pub fn build(self) -> Todo {
            self.todo
        }
    }

    /// Install a fmt subscriber honouring `RUST_LOG`, once per test binary.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use super::{DateTime, Utc};
    use chrono::Duration;
    use proptest::prelude::*;
    use todo_core::{Priority, Status, Todo};

    use super::helpers::TodoBuilder;

    /// Any priority.
    pub fn priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Medium),
            Just(Priority::High),
        ]
    }

    /// Any status.
    pub fn status() -> impl Strategy<Value = Status> {
        prop_oneof![Just(Status::Pending), Just(Status::Completed)]
    }

    /// A non-deleted todo for `owner` due within thirty days either side of `around`.
    pub fn todo(owner: &'static str, around: DateTime<Utc>) -> impl Strategy<Value = Todo> {
        (priority(), status(), -43_200_i64..43_200).prop_map(move |(priority, status, minutes)| {
            TodoBuilder::new(owner)
                .priority(priority)
                .status(status)
                .deadline(around + Duration::minutes(minutes))
                .build()
        })
    }

    /// Up to `max` todos for one owner.
    pub fn todos(
        owner: &'static str,
        around: DateTime<Utc>,
        max: usize,
    ) -> impl Strategy<Value = Vec<Todo>> {
        prop::collection::vec(todo(owner, around), 0..=max)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, test_clock, test_instant};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(test_instant());
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), test_instant() + Duration::minutes(5));
    }
}
