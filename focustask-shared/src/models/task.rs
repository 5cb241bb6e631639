/// Task model and database operations
///
/// A task belongs to one user and optionally to one of that user's
/// categories. Tasks instantiated from a recurring template point back to it
/// through `parent_recurring_task_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     name TEXT NOT NULL,
///     description TEXT,
///     due_date TEXT,                    -- YYYY-MM-DD
///     created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     importance TEXT NOT NULL DEFAULT 'medium',
///     estimated_duration_minutes INTEGER,
///     progress INTEGER NOT NULL DEFAULT 0,   -- percent, 0..=100
///     category_id INTEGER REFERENCES categories(id),
///     is_today_task INTEGER NOT NULL DEFAULT 0,
///     status TEXT NOT NULL DEFAULT 'pending',
///     completed_at TEXT,
///     suggested_by_ai INTEGER NOT NULL DEFAULT 0,
///     priority_score REAL NOT NULL DEFAULT 0.0,
///     hurdle_level INTEGER,             -- 1..=3
///     parent_recurring_task_id INTEGER REFERENCES recurring_tasks(id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use focustask_shared::models::task::{CreateTask, Importance, Task, TaskStatus};
/// use chrono::NaiveDate;
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     user_id: 1,
///     name: "Write report".to_string(),
///     description: Some("Monthly report".to_string()),
///     due_date: NaiveDate::from_ymd_opt(2024, 6, 15),
///     importance: Importance::High,
///     estimated_duration_minutes: Some(120),
///     progress: 0,
///     category_id: None,
///     is_today_task: true,
///     status: TaskStatus::Pending,
///     suggested_by_ai: false,
///     priority_score: 0.8,
///     hurdle_level: None,
///     parent_recurring_task_id: None,
/// }).await?;
///
/// let today = Task::list_today(&pool, task.user_id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

/// Task importance, ordered from low to high
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Medium => "medium",
            Importance::High => "high",
        }
    }
}

/// Task completion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not finished yet
    #[default]
    Pending,

    /// Finished (`completed_at` is set by the application)
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub importance: Importance,
    pub estimated_duration_minutes: Option<i32>,

    /// Completion percentage (0..=100)
    pub progress: i32,

    pub category_id: Option<i64>,

    /// Picked for today's focus list
    pub is_today_task: bool,

    pub status: TaskStatus,
    pub completed_at: Option<NaiveDateTime>,

    /// Created from an AI suggestion rather than by the user
    pub suggested_by_ai: bool,

    /// Ranking score produced by the prioritizer (0.0..=1.0)
    pub priority_score: f64,

    /// Perceived difficulty to get started (1..=3)
    pub hurdle_level: Option<i32>,

    pub parent_recurring_task_id: Option<i64>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub importance: Importance,
    pub estimated_duration_minutes: Option<i32>,
    pub progress: i32,
    pub category_id: Option<i64>,
    pub is_today_task: bool,
    pub status: TaskStatus,
    pub suggested_by_ai: bool,
    pub priority_score: f64,
    pub hurdle_level: Option<i32>,
    pub parent_recurring_task_id: Option<i64>,
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the user or category does not exist, or a CHECK
    /// constraint (progress, hurdle level) is violated.
    pub async fn create<'e, E>(executor: E, data: CreateTask) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, name, description, due_date, importance,
                               estimated_duration_minutes, progress, category_id,
                               is_today_task, status, suggested_by_ai, priority_score,
                               hurdle_level, parent_recurring_task_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, name, description, due_date, created_at, importance,
                      estimated_duration_minutes, progress, category_id, is_today_task,
                      status, completed_at, suggested_by_ai, priority_score, hurdle_level,
                      parent_recurring_task_id
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.importance)
        .bind(data.estimated_duration_minutes)
        .bind(data.progress)
        .bind(data.category_id)
        .bind(data.is_today_task)
        .bind(data.status)
        .bind(data.suggested_by_ai)
        .bind(data.priority_score)
        .bind(data.hurdle_level)
        .bind(data.parent_recurring_task_id)
        .fetch_one(executor)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, name, description, due_date, created_at, importance,
                   estimated_duration_minutes, progress, category_id, is_today_task,
                   status, completed_at, suggested_by_ai, priority_score, hurdle_level,
                   parent_recurring_task_id
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks of a user, highest priority first
    pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, name, description, due_date, created_at, importance,
                   estimated_duration_minutes, progress, category_id, is_today_task,
                   status, completed_at, suggested_by_ai, priority_score, hurdle_level,
                   parent_recurring_task_id
            FROM tasks
            WHERE user_id = ?
            ORDER BY priority_score DESC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists a user's pending tasks flagged for today, highest priority first
    pub async fn list_today(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, name, description, due_date, created_at, importance,
                   estimated_duration_minutes, progress, category_id, is_today_task,
                   status, completed_at, suggested_by_ai, priority_score, hurdle_level,
                   parent_recurring_task_id
            FROM tasks
            WHERE user_id = ? AND is_today_task = 1 AND status = 'pending'
            ORDER BY priority_score DESC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts total number of tasks
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
