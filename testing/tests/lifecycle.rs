//! Lifecycle service tests over the in-memory store

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use chrono::Duration;
use std::sync::Arc;
use todo_core::{
    OwnerId, Priority, ServiceConfig, SortField, SortOrder, Status, TodoError, TodoId, TodoQuery,
    TodoService, TodoStats, UpdateTodo,
};
use todo_testing::helpers::{
    TodoBuilder, create_request, create_request_due, init_test_tracing, set_status,
};
use todo_testing::{InMemoryTodoStore, ManualClock, test_instant};

fn service() -> (TodoService<InMemoryTodoStore>, Arc<ManualClock>) {
    init_test_tracing();
    let clock = Arc::new(ManualClock::new(test_instant()));
    let store = InMemoryTodoStore::new(clock.clone());
    (
        TodoService::new(store, clock.clone(), ServiceConfig::default()),
        clock,
    )
}

fn alice() -> OwnerId {
    OwnerId::new("alice")
}

fn bob() -> OwnerId {
    OwnerId::new("bob")
}

fn titles(todos: &[todo_core::Todo]) -> Vec<&str> {
    todos.iter().map(|t| t.title.as_str()).collect()
}

#[tokio::test]
async fn test_create_sets_defaults() {
    let (service, _) = service();

    let todo = service
        .create(&alice(), create_request("Write report"))
        .await
        .unwrap();

    assert_eq!(todo.owner_id, alice());
    assert_eq!(todo.status, Status::Pending);
    assert_eq!(todo.priority, Priority::Medium);
    assert!(!todo.is_deleted);
    assert_eq!(todo.completed_at, None);
    assert_eq!(todo.created_at, test_instant());
}

#[tokio::test]
async fn test_create_rejects_invalid_input_without_writing() {
    let (service, _) = service();

    let mut request = create_request("Write report");
    request.deadline = "next tuesday".to_string();
    let err = service.create(&alice(), request).await.unwrap_err();

    assert!(matches!(err, TodoError::Validation { field: "deadline", .. }));
    assert!(service.store().is_empty());
}

#[tokio::test]
async fn test_get_is_owner_scoped() {
    let (service, _) = service();
    let todo = service.create(&alice(), create_request("Mine")).await.unwrap();

    assert_eq!(service.get(todo.id, &alice()).await.unwrap().id, todo.id);
    assert_eq!(
        service.get(todo.id, &bob()).await.unwrap_err(),
        TodoError::NotFound
    );
}

#[tokio::test]
async fn test_other_owner_cannot_update_or_delete() {
    let (service, _) = service();
    let todo = service.create(&alice(), create_request("Mine")).await.unwrap();

    let err = service
        .update(todo.id, &bob(), set_status(Status::Completed))
        .await
        .unwrap_err();
    assert_eq!(err, TodoError::NotFound);

    let err = service.soft_delete(todo.id, &bob()).await.unwrap_err();
    assert_eq!(err, TodoError::NotFound);

    let stored = service.get(todo.id, &alice()).await.unwrap();
    assert_eq!(stored, todo);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let (service, _) = service();

    assert_eq!(
        service.get(TodoId::new(), &alice()).await.unwrap_err(),
        TodoError::NotFound
    );
}

#[tokio::test]
async fn test_soft_delete_hides_record_and_is_not_idempotent() {
    let (service, _) = service();
    let todo = service.create(&alice(), create_request("Gone")).await.unwrap();

    let confirmation = service.soft_delete(todo.id, &alice()).await.unwrap();
    assert_eq!(confirmation.message, "Todo deleted successfully");

    assert_eq!(
        service.get(todo.id, &alice()).await.unwrap_err(),
        TodoError::NotFound
    );
    assert_eq!(
        service.soft_delete(todo.id, &alice()).await.unwrap_err(),
        TodoError::NotFound
    );
    assert!(service
        .list(&alice(), &TodoQuery::default())
        .await
        .unwrap()
        .is_empty());

    // Still stored, only flagged.
    let raw = service.store().raw(todo.id).expect("record retained");
    assert!(raw.is_deleted);
    assert_eq!(raw.title, todo.title);
    assert_eq!(raw.status, todo.status);
}

#[tokio::test]
async fn test_update_after_soft_delete_is_not_found() {
    let (service, clock) = service();
    let todo = service.create(&alice(), create_request("Gone")).await.unwrap();
    service.soft_delete(todo.id, &alice()).await.unwrap();
    let deleted = service.store().raw(todo.id).unwrap();

    clock.advance(Duration::hours(1));
    let err = service
        .update(
            todo.id,
            &alice(),
            UpdateTodo {
                title: Some("Back again".to_string()),
                status: Some(Status::Completed),
                ..UpdateTodo::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err, TodoError::NotFound);
    assert_eq!(service.store().raw(todo.id).unwrap(), deleted);
}

#[tokio::test]
async fn test_deleted_record_is_invisible_to_every_operation() {
    let (service, _) = service();
    let ghost = TodoBuilder::new("alice")
        .title("Ghost")
        .priority(Priority::High)
        .deleted()
        .build();
    service.store().seed(ghost.clone());

    assert_eq!(
        service.get(ghost.id, &alice()).await.unwrap_err(),
        TodoError::NotFound
    );
    assert_eq!(
        service
            .update(ghost.id, &alice(), set_status(Status::Completed))
            .await
            .unwrap_err(),
        TodoError::NotFound
    );
    assert_eq!(
        service.soft_delete(ghost.id, &alice()).await.unwrap_err(),
        TodoError::NotFound
    );
    assert!(service
        .list(&alice(), &TodoQuery::default())
        .await
        .unwrap()
        .is_empty());
    assert!(service.ranked(&alice()).await.unwrap().is_empty());
    assert_eq!(service.stats(&alice()).await.unwrap(), TodoStats::default());

    assert_eq!(service.store().raw(ghost.id).unwrap(), ghost);
}

#[tokio::test]
async fn test_completion_stamps_and_clears_completed_at() {
    let (service, clock) = service();
    let todo = service.create(&alice(), create_request("Task")).await.unwrap();

    clock.advance(Duration::hours(2));
    let completed = service
        .update(todo.id, &alice(), set_status(Status::Completed))
        .await
        .unwrap();
    assert_eq!(completed.status, Status::Completed);
    assert_eq!(completed.completed_at, Some(test_instant() + Duration::hours(2)));
    assert_eq!(completed.updated_at, test_instant() + Duration::hours(2));

    let pending = service
        .update(todo.id, &alice(), set_status(Status::Pending))
        .await
        .unwrap();
    assert_eq!(pending.status, Status::Pending);
    assert_eq!(pending.completed_at, None);
}

#[tokio::test]
async fn test_completing_twice_keeps_first_timestamp() {
    let (service, clock) = service();
    let todo = service.create(&alice(), create_request("Task")).await.unwrap();

    let first = service
        .update(todo.id, &alice(), set_status(Status::Completed))
        .await
        .unwrap();

    clock.advance(Duration::days(1));
    let second = service
        .update(todo.id, &alice(), set_status(Status::Completed))
        .await
        .unwrap();

    assert_eq!(second.completed_at, first.completed_at);
}

#[tokio::test]
async fn test_partial_update_leaves_absent_fields() {
    let (service, _) = service();
    let todo = service.create(&alice(), create_request("Task")).await.unwrap();

    let updated = service
        .update(
            todo.id,
            &alice(),
            UpdateTodo {
                title: Some("Renamed".to_string()),
                priority: Some(Priority::High),
                deadline: Some("2025-02-01".to_string()),
                ..UpdateTodo::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.deadline.to_rfc3339(), "2025-02-01T00:00:00+00:00");
    assert_eq!(updated.description, todo.description);
    assert_eq!(updated.status, Status::Pending);
    assert_eq!(updated.owner_id, alice());
}

#[tokio::test]
async fn test_invalid_deadline_update_leaves_record_unchanged() {
    let (service, _) = service();
    let todo = service.create(&alice(), create_request("Task")).await.unwrap();

    let err = service
        .update(
            todo.id,
            &alice(),
            UpdateTodo {
                title: Some("Should not stick".to_string()),
                deadline: Some("not-a-date".to_string()),
                ..UpdateTodo::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TodoError::Validation { field: "deadline", .. }));
    assert_eq!(service.get(todo.id, &alice()).await.unwrap(), todo);
}

#[tokio::test]
async fn test_list_filters_conjunctively() {
    let (service, _) = service();
    let owner = alice();
    let due = test_instant() + Duration::days(3);

    for (title, priority) in [
        ("high-a", Priority::High),
        ("high-b", Priority::High),
        ("low", Priority::Low),
    ] {
        service
            .create(&owner, create_request_due(title, priority, due))
            .await
            .unwrap();
    }
    let listed = service.list(&owner, &TodoQuery::default()).await.unwrap();
    service
        .update(listed[0].id, &owner, set_status(Status::Completed))
        .await
        .unwrap();

    let query = TodoQuery {
        status: Some(Status::Pending),
        priority: Some(Priority::High),
        ..TodoQuery::default()
    };
    let found = service.list(&owner, &query).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].priority, Priority::High);
    assert_eq!(found[0].status, Status::Pending);
}

#[tokio::test]
async fn test_list_defaults_to_newest_first() {
    let (service, clock) = service();

    for title in ["first", "second", "third"] {
        service.create(&alice(), create_request(title)).await.unwrap();
        clock.advance(Duration::minutes(1));
    }

    let listed = service.list(&alice(), &TodoQuery::default()).await.unwrap();
    assert_eq!(titles(&listed), vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_list_only_shows_own_todos() {
    let (service, _) = service();
    service.create(&alice(), create_request("hers")).await.unwrap();
    service.create(&bob(), create_request("his")).await.unwrap();

    let listed = service.list(&bob(), &TodoQuery::default()).await.unwrap();
    assert_eq!(titles(&listed), vec!["his"]);
}

#[tokio::test]
async fn test_list_priority_sort_is_lexical_but_rank_is_weighted() {
    let (service, _) = service();
    let owner = alice();
    let due = test_instant() + Duration::days(1);

    for (title, priority) in [
        ("medium", Priority::Medium),
        ("low", Priority::Low),
        ("high", Priority::High),
    ] {
        service
            .create(&owner, create_request_due(title, priority, due))
            .await
            .unwrap();
    }

    let query = TodoQuery {
        sort_by: Some(SortField::Priority),
        sort_order: Some(SortOrder::Asc),
        ..TodoQuery::default()
    };
    let listed = service.list(&owner, &query).await.unwrap();
    assert_eq!(titles(&listed), vec!["high", "low", "medium"]);

    let ranked = service.ranked(&owner).await.unwrap();
    assert_eq!(titles(&ranked), vec!["high", "medium", "low"]);
}

#[tokio::test]
async fn test_list_sorts_by_deadline() {
    let (service, _) = service();
    let owner = alice();

    for (title, days) in [("later", 5), ("soonest", 1), ("middle", 3)] {
        service
            .create(
                &owner,
                create_request_due(title, Priority::Low, test_instant() + Duration::days(days)),
            )
            .await
            .unwrap();
    }

    let query = TodoQuery {
        sort_by: Some(SortField::Deadline),
        sort_order: Some(SortOrder::Asc),
        ..TodoQuery::default()
    };
    let listed = service.list(&owner, &query).await.unwrap();
    assert_eq!(titles(&listed), vec!["soonest", "middle", "later"]);
}

#[tokio::test]
async fn test_ranked_orders_high_before_low_on_same_deadline() {
    let (service, _) = service();
    let owner = alice();
    let due = test_instant() + Duration::days(1);

    service
        .create(&owner, create_request_due("B", Priority::Low, due))
        .await
        .unwrap();
    service
        .create(&owner, create_request_due("A", Priority::High, due))
        .await
        .unwrap();

    let ranked = service.ranked(&owner).await.unwrap();
    assert_eq!(titles(&ranked), vec!["A", "B"]);
}

#[tokio::test]
async fn test_ranked_same_priority_earlier_deadline_first() {
    let (service, _) = service();
    let owner = alice();

    service
        .create(
            &owner,
            create_request_due("late", Priority::Medium, test_instant() + Duration::days(4)),
        )
        .await
        .unwrap();
    service
        .create(
            &owner,
            create_request_due("early", Priority::Medium, test_instant() + Duration::days(2)),
        )
        .await
        .unwrap();

    let ranked = service.ranked(&owner).await.unwrap();
    assert_eq!(titles(&ranked), vec!["early", "late"]);
}

#[tokio::test]
async fn test_stats_empty_scope_is_zero() {
    let (service, _) = service();
    service.create(&bob(), create_request("not hers")).await.unwrap();

    assert_eq!(service.stats(&alice()).await.unwrap(), TodoStats::default());
}

#[tokio::test]
async fn test_stats_counts_overdue_and_skips_deleted() {
    let (service, clock) = service();
    let owner = alice();

    let overdue = service
        .create(
            &owner,
            create_request_due("overdue", Priority::High, test_instant() + Duration::hours(1)),
        )
        .await
        .unwrap();
    let done = service
        .create(
            &owner,
            create_request_due("done", Priority::Low, test_instant() + Duration::hours(1)),
        )
        .await
        .unwrap();
    let deleted = service
        .create(&owner, create_request("deleted"))
        .await
        .unwrap();

    service
        .update(done.id, &owner, set_status(Status::Completed))
        .await
        .unwrap();
    service.soft_delete(deleted.id, &owner).await.unwrap();
    clock.advance(Duration::hours(2));

    let stats = service.stats(&owner).await.unwrap();
    assert_eq!(
        stats,
        TodoStats {
            total: 2,
            completed: 1,
            pending: 1,
            high: 1,
            medium: 0,
            low: 1,
            overdue: 1,
        }
    );
    assert_eq!(overdue.status, Status::Pending);
}

#[tokio::test]
async fn test_store_failure_surfaces_as_store_error() {
    let (service, _) = service();
    service.store().set_unavailable(true);

    let err = service
        .create(&alice(), create_request("Task"))
        .await
        .unwrap_err();
    assert!(matches!(err, TodoError::Store(_)));
    assert!(service.ping().await.is_err());
}
