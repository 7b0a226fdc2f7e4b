//! Urgency ranking.
//!
//! Orders todos by a single score that combines time to deadline with
//! priority weight:
//!
//! ```text
//! score = days_until_deadline - weight(priority) * 2
//! ```
//!
//! Lower scores rank first. Overdue items have negative days and therefore
//! float to the top.

use crate::types::Todo;
use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;
const PRIORITY_FACTOR: f64 = 2.0;

/// Fractional days from `now` until `deadline` (negative when past).
#[must_use]
#[allow(clippy::cast_precision_loss)] // millisecond offsets stay far below 2^52
pub fn days_until_deadline(deadline: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (deadline - now).num_milliseconds() as f64;
    millis / 1000.0 / SECONDS_PER_DAY
}

/// Urgency score of a single todo at `now`.
///
/// # Examples
///
/// ```
/// # use chrono::{Duration, Utc};
/// # use todo_core::ranking::urgency_score;
/// # use todo_core::{OwnerId, Priority, Status, Todo, TodoId};
/// let now = Utc::now();
/// let todo = Todo {
///     id: TodoId::new(),
///     title: "Report".into(),
///     description: "Q3".into(),
///     owner_id: OwnerId::new("u1"),
///     priority: Priority::Low,
///     status: Status::Pending,
///     deadline: now + Duration::days(2),
///     completed_at: None,
///     is_deleted: false,
///     created_at: now,
///     updated_at: now,
/// };
/// assert!(urgency_score(&todo, now).abs() < 1e-9);
/// ```
#[must_use]
pub fn urgency_score(todo: &Todo, now: DateTime<Utc>) -> f64 {
    days_until_deadline(todo.deadline, now) - f64::from(todo.priority.weight()) * PRIORITY_FACTOR
}

/// Order `todos` by ascending urgency score at `now`.
///
/// Every score is computed against the same `now`. Equal scores keep their
/// input order.
#[must_use]
pub fn rank(todos: Vec<Todo>, now: DateTime<Utc>) -> Vec<Todo> {
    let mut scored: Vec<(f64, Todo)> = todos
        .into_iter()
        .map(|todo| (urgency_score(&todo, now), todo))
        .collect();

    scored.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    scored.into_iter().map(|(_, todo)| todo).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{OwnerId, Priority, Status, TodoId};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn todo(title: &str, priority: Priority, deadline: DateTime<Utc>) -> Todo {
        Todo {
            id: TodoId::new(),
            title: title.to_string(),
            description: "d".to_string(),
            owner_id: OwnerId::new("u1"),
            priority,
            status: Status::Pending,
            deadline,
            completed_at: None,
            is_deleted: false,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn titles(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_high_ranks_before_low_with_same_deadline() {
        // A: 1 - 3 * 2 = -5, B: 1 - 1 * 2 = -1
        let a = todo("A", Priority::High, now() + Duration::days(1));
        let b = todo("B", Priority::Low, now() + Duration::days(1));

        assert!((urgency_score(&a, now()) + 5.0).abs() < 1e-9);
        assert!((urgency_score(&b, now()) + 1.0).abs() < 1e-9);
        assert_eq!(titles(&rank(vec![b, a], now())), vec!["A", "B"]);
    }

    #[test]
    fn test_same_priority_earlier_deadline_first() {
        let later = todo("later", Priority::Medium, now() + Duration::days(3));
        let sooner = todo("sooner", Priority::Medium, now() + Duration::hours(6));

        assert_eq!(
            titles(&rank(vec![later, sooner], now())),
            vec!["sooner", "later"]
        );
    }

    #[test]
    fn test_high_priority_beats_low_due_slightly_sooner() {
        // Each priority step is worth two days.
        let high = todo("high", Priority::High, now() + Duration::days(4));
        let low = todo("low", Priority::Low, now() + Duration::days(1));

        assert_eq!(titles(&rank(vec![low, high], now())), vec!["high", "low"]);
    }

    #[test]
    fn test_overdue_scores_negative() {
        let overdue = todo("overdue", Priority::Low, now() - Duration::days(1));
        assert!(urgency_score(&overdue, now()) < 0.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let deadline = now() + Duration::days(1);
        let todos = vec![
            todo("first", Priority::High, deadline),
            todo("second", Priority::High, deadline),
            todo("third", Priority::High, deadline),
        ];

        assert_eq!(
            titles(&rank(todos, now())),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new(), now()).is_empty());
    }
}
