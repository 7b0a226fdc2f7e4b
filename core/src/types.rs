//! Domain types for todo items.
//!
//! The `Todo` record plus the shapes that flow in and out of the store:
//! filters, sort specifications, partial patches, and the request bodies the
//! lifecycle service validates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a todo item.
///
/// Assigned by the store at insertion and never changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Creates a new random `TodoId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Parses an identifier from its textual form.
    ///
    /// Returns `None` for anything that is not a UUID; such a value cannot
    /// name a stored todo.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of the user that owns a todo.
///
/// Always taken from the caller's verified identity, never from a request body.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wraps a verified user identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Enums
// ============================================================================

/// A string did not name any variant of a todo enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// How important a todo is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority
    Low,
    /// Medium priority (the default)
    #[default]
    Medium,
    /// High priority
    High,
}

impl Priority {
    /// Stored and serialized representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Domain weight used by the urgency ranking: high 3, medium 2, low 1.
    #[must_use]
    pub const fn weight(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion status of a todo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Not done yet (the default)
    #[default]
    Pending,
    /// Done
    Completed,
}

impl Status {
    /// Stored and serialized representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Records
// ============================================================================

/// A todo item as persisted by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Short title (non-empty)
    pub title: String,
    /// Longer description (non-empty)
    pub description: String,
    /// Owning user
    pub owner_id: OwnerId,
    /// Priority
    pub priority: Priority,
    /// Completion status
    pub status: Status,
    /// When the todo is due
    pub deadline: DateTime<Utc>,
    /// When the todo was last marked completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete flag
    pub is_deleted: bool,
    /// Set by the store on insert
    pub created_at: DateTime<Utc>,
    /// Set by the store on every write
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// A pending todo whose deadline lies before `reference`.
    #[must_use]
    pub fn is_overdue(&self, reference: DateTime<Utc>) -> bool {
        self.status == Status::Pending && self.deadline < reference
    }
}

/// A validated todo ready for insertion.
///
/// The store assigns `id`, timestamps, `status = pending` and
/// `is_deleted = false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodo {
    /// Owning user
    pub owner_id: OwnerId,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Priority
    pub priority: Priority,
    /// Deadline
    pub deadline: DateTime<Utc>,
}

/// A partial update. `None` leaves the stored field untouched.
///
/// `completed_at` is doubly optional: `Some(None)` clears the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New priority
    pub priority: Option<Priority>,
    /// New status
    pub status: Option<Status>,
    /// New deadline
    pub deadline: Option<DateTime<Utc>>,
    /// Set or clear the completion timestamp
    pub completed_at: Option<Option<DateTime<Utc>>>,
    /// Set the soft-delete flag
    pub is_deleted: Option<bool>,
}

impl TodoPatch {
    /// A patch that only raises the soft-delete flag.
    #[must_use]
    pub fn soft_delete() -> Self {
        Self {
            is_deleted: Some(true),
            ..Self::default()
        }
    }

    /// Apply the patch to an in-memory record. Does not touch `updated_at`.
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            todo.description.clone_from(description);
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
        if let Some(deadline) = self.deadline {
            todo.deadline = deadline;
        }
        if let Some(completed_at) = self.completed_at {
            todo.completed_at = completed_at;
        }
        if let Some(is_deleted) = self.is_deleted {
            todo.is_deleted = is_deleted;
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Owner-scoped selection of todos.
///
/// Deleted todos never match; there is no way to express a query over them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoFilter {
    /// Owner scope (always present)
    pub owner_id: OwnerId,
    /// Restrict to a single todo
    pub id: Option<TodoId>,
    /// Restrict by status
    pub status: Option<Status>,
    /// Restrict by priority
    pub priority: Option<Priority>,
}

impl TodoFilter {
    /// All non-deleted todos of `owner_id`.
    #[must_use]
    pub fn for_owner(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            id: None,
            status: None,
            priority: None,
        }
    }

    /// Narrow to one todo.
    #[must_use]
    pub fn with_id(mut self, id: TodoId) -> Self {
        self.id = Some(id);
        self
    }

    /// Narrow by status (`None` is a no-op).
    #[must_use]
    pub fn with_status(mut self, status: Option<Status>) -> Self {
        self.status = status;
        self
    }

    /// Narrow by priority (`None` is a no-op).
    #[must_use]
    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// Whether `todo` is selected by this filter.
    #[must_use]
    pub fn matches(&self, todo: &Todo) -> bool {
        !todo.is_deleted
            && todo.owner_id == self.owner_id
            && self.id.is_none_or(|id| todo.id == id)
            && self.status.is_none_or(|status| todo.status == status)
            && self.priority.is_none_or(|priority| todo.priority == priority)
    }
}

/// Field a todo listing is sorted by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Insertion time (the default)
    #[default]
    CreatedAt,
    /// Deadline
    Deadline,
    /// Priority, compared by its stored string ("high" < "low" < "medium")
    Priority,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending (the default)
    #[default]
    Desc,
}

/// Single-key sort specification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortSpec {
    /// Key
    pub field: SortField,
    /// Direction
    pub order: SortOrder,
}

impl SortSpec {
    /// Sort by `field` in `order`.
    #[must_use]
    pub const fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Insertion order, oldest first.
    #[must_use]
    pub const fn oldest_first() -> Self {
        Self::new(SortField::CreatedAt, SortOrder::Asc)
    }

    /// Compare two todos on the raw field value.
    ///
    /// Equal keys compare `Equal` in both directions so a stable sort keeps
    /// the input order for ties.
    #[must_use]
    pub fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Deadline => a.deadline.cmp(&b.deadline),
            SortField::Priority => a.priority.as_str().cmp(b.priority.as_str()),
        };

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Listing parameters accepted from callers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TodoQuery {
    /// Filter by status
    pub status: Option<Status>,
    /// Filter by priority
    pub priority: Option<Priority>,
    /// Sort key (default `createdAt`)
    pub sort_by: Option<SortField>,
    /// Sort direction (default `desc`)
    pub sort_order: Option<SortOrder>,
}

impl TodoQuery {
    /// The effective sort after applying defaults.
    #[must_use]
    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(
            self.sort_by.unwrap_or_default(),
            self.sort_order.unwrap_or_default(),
        )
    }
}

// ============================================================================
// Requests and responses
// ============================================================================

/// Body of a create request.
///
/// Missing text fields deserialize as empty strings so validation can report
/// them by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTodo {
    /// Title
    #[serde(default)]
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Priority (default medium)
    #[serde(default)]
    pub priority: Option<Priority>,
    /// ISO 8601 deadline
    #[serde(default)]
    pub deadline: String,
}

/// Body of a partial update request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTodo {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New priority
    pub priority: Option<Priority>,
    /// New status
    pub status: Option<Status>,
    /// New ISO 8601 deadline
    pub deadline: Option<String>,
}

/// Per-owner counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    /// All non-deleted todos
    pub total: u64,
    /// Completed todos
    pub completed: u64,
    /// Pending todos
    pub pending: u64,
    /// High priority todos
    pub high: u64,
    /// Medium priority todos
    pub medium: u64,
    /// Low priority todos
    pub low: u64,
    /// Pending todos past their deadline
    pub overdue: u64,
}

/// Acknowledgement returned by operations without a record to return.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Human-readable outcome
    pub message: String,
}
