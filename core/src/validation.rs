//! Input validation for create and update requests.
//!
//! Validation stops at the first failing field and reports it by its request
//! name. Nothing here touches the store.

use crate::config::ServiceConfig;
use crate::error::{Result, TodoError};
use crate::types::{CreateTodo, NewTodo, OwnerId, TodoPatch, UpdateTodo};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an ISO 8601 deadline.
///
/// Accepts a full RFC 3339 timestamp, a date-time without offset (read as
/// UTC), or a bare date (midnight UTC).
///
/// # Errors
///
/// Returns [`TodoError::Validation`] on `deadline` when the value matches none
/// of the accepted forms.
///
/// # Examples
///
/// ```
/// use todo_core::validation::parse_deadline;
///
/// let at = parse_deadline("2025-03-01").unwrap();
/// assert_eq!(at.to_rfc3339(), "2025-03-01T00:00:00+00:00");
/// ```
pub fn parse_deadline(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(at.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(TodoError::validation(
        "deadline",
        format!("`{raw}` is not a valid ISO 8601 date"),
    ))
}

/// Check a required text field: non-empty after trimming, at most `max` characters.
///
/// # Errors
///
/// Returns [`TodoError::Validation`] on `field`.
pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TodoError::validation(field, "must not be empty"));
    }

    if value.chars().count() > max {
        return Err(TodoError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }

    Ok(())
}

/// Validate a create request and bind it to `owner`.
///
/// # Errors
///
/// Returns [`TodoError::Validation`] for the first field that fails.
pub fn validate_create(
    owner: &OwnerId,
    request: CreateTodo,
    config: &ServiceConfig,
) -> Result<NewTodo> {
    require_text("title", &request.title, config.max_title_length)?;
    require_text(
        "description",
        &request.description,
        config.max_description_length,
    )?;
    let deadline = parse_deadline(&request.deadline)?;

    Ok(NewTodo {
        owner_id: owner.clone(),
        title: request.title,
        description: request.description,
        priority: request.priority.unwrap_or_default(),
        deadline,
    })
}

/// Validate an update request into a store patch.
///
/// Fields that are present must satisfy the same rules as on create. The
/// returned patch never sets `completed_at` or `is_deleted`; the lifecycle
/// service owns those.
///
/// # Errors
///
/// Returns [`TodoError::Validation`] for the first field that fails.
pub fn validate_update(request: UpdateTodo, config: &ServiceConfig) -> Result<TodoPatch> {
    if let Some(title) = &request.title {
        require_text("title", title, config.max_title_length)?;
    }
    if let Some(description) = &request.description {
        require_text("description", description, config.max_description_length)?;
    }
    let deadline = request
        .deadline
        .as_deref()
        .map(parse_deadline)
        .transpose()?;

    Ok(TodoPatch {
        title: request.title,
        description: request.description,
        priority: request.priority,
        status: request.status,
        deadline,
        completed_at: None,
        is_deleted: None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Priority, Status};
    use chrono::TimeZone;

    fn create(title: &str, description: &str, deadline: &str) -> CreateTodo {
        CreateTodo {
            title: title.to_string(),
            description: description.to_string(),
            priority: None,
            deadline: deadline.to_string(),
        }
    }

    #[test]
    fn test_parse_deadline_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();

        assert_eq!(parse_deadline("2025-03-01T12:30:00Z").unwrap(), expected);
        assert_eq!(parse_deadline("2025-03-01T14:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_deadline("2025-03-01T12:30:00").unwrap(), expected);
        assert_eq!(parse_deadline("2025-03-01T12:30").unwrap(), expected);
        assert_eq!(
            parse_deadline("2025-03-01").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_deadline_rejects_garbage() {
        for raw in ["", "tomorrow", "2025-13-01", "01/03/2025"] {
            let err = parse_deadline(raw).unwrap_err();
            assert!(matches!(err, TodoError::Validation { field: "deadline", .. }));
        }
    }

    #[test]
    fn test_create_defaults_priority_to_medium() {
        let owner = OwnerId::new("u1");
        let new = validate_create(
            &owner,
            create("Buy milk", "Two litres", "2025-03-01"),
            &ServiceConfig::default(),
        )
        .unwrap();

        assert_eq!(new.priority, Priority::Medium);
        assert_eq!(new.owner_id, owner);
    }

    #[test]
    fn test_create_reports_first_failing_field() {
        let owner = OwnerId::new("u1");
        let config = ServiceConfig::default();

        let err = validate_create(&owner, create("", "", "nope"), &config).unwrap_err();
        assert!(matches!(err, TodoError::Validation { field: "title", .. }));

        let err = validate_create(&owner, create("a", "  ", "nope"), &config).unwrap_err();
        assert!(matches!(err, TodoError::Validation { field: "description", .. }));

        let err = validate_create(&owner, create("a", "b", "nope"), &config).unwrap_err();
        assert!(matches!(err, TodoError::Validation { field: "deadline", .. }));
    }

    #[test]
    fn test_length_limits_count_characters() {
        let config = ServiceConfig::default().with_max_title_length(3);
        assert!(require_text("title", "äöü", config.max_title_length).is_ok());
        assert!(require_text("title", "abcd", config.max_title_length).is_err());
    }

    #[test]
    fn test_update_passes_through_present_fields() {
        let patch = validate_update(
            UpdateTodo {
                status: Some(Status::Completed),
                deadline: Some("2025-06-01".to_string()),
                ..UpdateTodo::default()
            },
            &ServiceConfig::default(),
        )
        .unwrap();

        assert_eq!(patch.status, Some(Status::Completed));
        assert!(patch.deadline.is_some());
        assert_eq!(patch.title, None);
        assert_eq!(patch.completed_at, None);
    }

    #[test]
    fn test_update_rejects_empty_title() {
        let err = validate_update(
            UpdateTodo {
                title: Some(String::new()),
                ..UpdateTodo::default()
            },
            &ServiceConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TodoError::Validation { field: "title", .. }));
    }
}
