use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use todo_core::types::ParseEnumError;
use todo_core::{
    NewTodo, OwnerId, Result, SortField, SortOrder, SortSpec, Todo, TodoError, TodoFilter, TodoId,
    TodoPatch, TodoStats, TodoStore,
};
use uuid::Uuid;

const COLUMNS: &str = "id, title, description, owner_id, priority, status, deadline, \
                       completed_at, is_deleted, created_at, updated_at";

// $1 owner, $2 id, $3 status, $4 priority
const FILTER: &str = "owner_id = $1 AND is_deleted = FALSE \
                      AND ($2::uuid IS NULL OR id = $2) \
                      AND ($3::text IS NULL OR status = $3) \
                      AND ($4::text IS NULL OR priority = $4)";

/// `PostgreSQL`-backed todo store.
///
/// Ties in any sort are broken by insertion order (`seq`).
#[derive(Clone, Debug)]
pub struct PostgresTodoStore {
    pool: PgPool,
}

impl PostgresTodoStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if migrations fail.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| TodoError::Store(format!("Migration failed: {e}")))?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    title: String,
    description: String,
    owner_id: String,
    priority: String,
    status: String,
    deadline: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TodoRow {
    fn into_todo(self) -> Result<Todo> {
        let id = self.id;
        let corrupt =
            move |e: ParseEnumError| TodoError::Store(format!("Invalid stored todo {id}: {e}"));

        Ok(Todo {
            id: TodoId::from_uuid(self.id),
            priority: self.priority.parse().map_err(corrupt)?,
            status: self.status.parse().map_err(corrupt)?,
            title: self.title,
            description: self.description,
            owner_id: OwnerId::new(self.owner_id),
            deadline: self.deadline,
            completed_at: self.completed_at,
            is_deleted: self.is_deleted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    total: i64,
    completed: i64,
    pending: i64,
    high: i64,
    medium: i64,
    low: i64,
    overdue: i64,
}

impl From<StatsRow> for TodoStats {
    fn from(row: StatsRow) -> Self {
        let count = |n: i64| u64::try_from(n).unwrap_or_default();
        Self {
            total: count(row.total),
            completed: count(row.completed),
            pending: count(row.pending),
            high: count(row.high),
            medium: count(row.medium),
            low: count(row.low),
            overdue: count(row.overdue),
        }
    }
}

const fn order_by(sort: SortSpec) -> &'static str {
    match (sort.field, sort.order) {
        (SortField::CreatedAt, SortOrder::Asc) => "created_at ASC",
        (SortField::CreatedAt, SortOrder::Desc) => "created_at DESC",
        (SortField::Deadline, SortOrder::Asc) => "deadline ASC",
        (SortField::Deadline, SortOrder::Desc) => "deadline DESC",
        (SortField::Priority, SortOrder::Asc) => "priority COLLATE \"C\" ASC",
        (SortField::Priority, SortOrder::Desc) => "priority COLLATE \"C\" DESC",
    }
}

fn bind_filter<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &'q TodoFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(filter.owner_id.as_str())
        .bind(filter.id.map(TodoId::into_inner))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.priority.map(|p| p.as_str()))
}

fn store_error(operation: &'static str, e: &sqlx::Error) -> TodoError {
    tracing::error!(operation, error = %e, "Todo store query failed");
    metrics::counter!("todo_store.errors", "operation" => operation).increment(1);
    TodoError::Store(format!("Failed to {operation}: {e}"))
}

impl TodoStore for PostgresTodoStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo> {
        let query = format!(
            "INSERT INTO todos (id, title, description, owner_id, priority, deadline)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );

        let row: TodoRow = sqlx::query_as(&query)
            .bind(Uuid::new_v4())
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.owner_id.as_str())
            .bind(todo.priority.as_str())
            .bind(todo.deadline)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error("insert todo", &e))?;

        metrics::counter!("todo_store.inserts").increment(1);
        row.into_todo()
    }

    async fn find_one(&self, filter: &TodoFilter) -> Result<Option<Todo>> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE {FILTER} ORDER BY seq LIMIT 1");

        let row: Option<TodoRow> = bind_filter(sqlx::query_as(&query), filter)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find todo", &e))?;

        metrics::counter!("todo_store.reads").increment(1);
        row.map(TodoRow::into_todo).transpose()
    }

    async fn find(&self, filter: &TodoFilter, sort: SortSpec) -> Result<Vec<Todo>> {
        let query = format!(
            "SELECT {COLUMNS} FROM todos WHERE {FILTER} ORDER BY {}, seq ASC",
            order_by(sort)
        );

        let rows: Vec<TodoRow> = bind_filter(sqlx::query_as(&query), filter)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("list todos", &e))?;

        metrics::counter!("todo_store.reads").increment(1);
        rows.into_iter().map(TodoRow::into_todo).collect()
    }

    async fn update_one(&self, filter: &TodoFilter, patch: &TodoPatch) -> Result<Option<Todo>> {
        // The filter is applied twice: once to pick the row, once more after
        // the row lock is taken so a concurrent delete is honoured.
        let query = format!(
            "UPDATE todos SET
                 title        = COALESCE($5, title),
                 description  = COALESCE($6, description),
                 priority     = COALESCE($7, priority),
                 status       = COALESCE($8, status),
                 deadline     = COALESCE($9, deadline),
                 completed_at = CASE WHEN $10 THEN $11 ELSE completed_at END,
                 is_deleted   = COALESCE($12, is_deleted),
                 updated_at   = now()
             WHERE seq = (SELECT seq FROM todos WHERE {FILTER} ORDER BY seq LIMIT 1)
               AND {FILTER}
             RETURNING {COLUMNS}"
        );

        let row: Option<TodoRow> = bind_filter(sqlx::query_as(&query), filter)
            .bind(patch.title.as_deref())
            .bind(patch.description.as_deref())
            .bind(patch.priority.map(|p| p.as_str()))
            .bind(patch.status.map(|s| s.as_str()))
            .bind(patch.deadline)
            .bind(patch.completed_at.is_some())
            .bind(patch.completed_at.flatten())
            .bind(patch.is_deleted)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("update todo", &e))?;

        if row.is_none() {
            tracing::debug!(owner_id = %filter.owner_id, "Update matched no todo");
        }

        metrics::counter!("todo_store.updates").increment(1);
        row.map(TodoRow::into_todo).transpose()
    }

    async fn aggregate(&self, filter: &TodoFilter, reference: DateTime<Utc>) -> Result<TodoStats> {
        let query = format!(
            "SELECT
                 COUNT(*)                                                   AS total,
                 COUNT(*) FILTER (WHERE status = 'completed')               AS completed,
                 COUNT(*) FILTER (WHERE status = 'pending')                 AS pending,
                 COUNT(*) FILTER (WHERE priority = 'high')                  AS high,
                 COUNT(*) FILTER (WHERE priority = 'medium')                AS medium,
                 COUNT(*) FILTER (WHERE priority = 'low')                   AS low,
                 COUNT(*) FILTER (WHERE status = 'pending' AND deadline < $5) AS overdue
             FROM todos
             WHERE {FILTER}"
        );

        let row: StatsRow = bind_filter(sqlx::query_as(&query), filter)
            .bind(reference)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error("aggregate todos", &e))?;

        metrics::counter!("todo_store.reads").increment(1);
        Ok(row.into())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("ping database", &e))?;
        Ok(())
    }

    // PostgreSQL falls back to the user name when the URL names no database.
    fn database_name(&self) -> Option<String> {
        let options = self.pool.connect_options();
        Some(
            options
                .get_database()
                .unwrap_or_else(|| options.get_username())
                .to_string(),
        )
    }
}
