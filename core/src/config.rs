//! Service configuration.
//!
//! Values are supplied by the application at startup and handed to
//! [`TodoService::new`](crate::TodoService::new); nothing here reads the
//! environment.

/// Limits applied by the lifecycle service when validating input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Maximum title length in characters.
    ///
    /// Default: 500
    pub max_title_length: usize,

    /// Maximum description length in characters.
    ///
    /// Default: 5000
    pub max_description_length: usize,
}

impl ServiceConfig {
    /// Create a configuration with default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_title_length: 500,
            max_description_length: 5000,
        }
    }

    /// Set the maximum title length.
    #[must_use]
    pub const fn with_max_title_length(mut self, chars: usize) -> Self {
        self.max_title_length = chars;
        self
    }

    /// Set the maximum description length.
    #[must_use]
    pub const fn with_max_description_length(mut self, chars: usize) -> Self {
        self.max_description_length = chars;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}
