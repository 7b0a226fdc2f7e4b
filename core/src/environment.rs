//! Injected dependencies that are not persistence.

use chrono::{DateTime, Utc};

/// Clock trait - abstracts time operations for testability
///
/// The service reads the clock once per operation, so every item in a single
/// ranking or statistics call is measured against the same instant.
///
/// # Examples
///
/// ```
/// use todo_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let before = chrono::Utc::now();
/// assert!(clock.now() >= before);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
