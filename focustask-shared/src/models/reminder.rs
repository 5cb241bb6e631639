/// Task reminders
///
/// A reminder belongs to one task. It also records the owning user, which
/// must match the task's user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE reminders (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     task_id INTEGER NOT NULL REFERENCES tasks(id),
///     scheduled_time TEXT NOT NULL,     -- YYYY-MM-DD HH:MM:SS
///     sent_time TEXT,
///     delivery_status TEXT NOT NULL DEFAULT 'pending',
///     delivery_method TEXT NOT NULL DEFAULT 'in_app',
///     retry_count INTEGER NOT NULL DEFAULT 0,
///     last_error_message TEXT
/// );
/// ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    Sent,
    Failed,
    Cancelled,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    #[default]
    InApp,
    Email,
    Push,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::InApp => "in_app",
            DeliveryMethod::Email => "email",
            DeliveryMethod::Push => "push",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reminder {
    pub id: i64,
    pub user_id: i64,
    pub task_id: i64,
    pub scheduled_time: NaiveDateTime,
    pub sent_time: Option<NaiveDateTime>,
    pub delivery_status: DeliveryStatus,
    pub delivery_method: DeliveryMethod,
    pub retry_count: i32,
    pub last_error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReminder {
    pub user_id: i64,
    pub task_id: i64,
    pub scheduled_time: NaiveDateTime,
    pub delivery_status: DeliveryStatus,
    pub delivery_method: DeliveryMethod,
    pub retry_count: i32,
}

impl Reminder {
    pub async fn create<'e, E>(executor: E, data: CreateReminder) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (user_id, task_id, scheduled_time, delivery_status,
                                   delivery_method, retry_count)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, task_id, scheduled_time, sent_time, delivery_status,
                      delivery_method, retry_count, last_error_message
            "#,
        )
        .bind(data.user_id)
        .bind(data.task_id)
        .bind(data.scheduled_time)
        .bind(data.delivery_status)
        .bind(data.delivery_method)
        .bind(data.retry_count)
        .fetch_one(executor)
        .await?;

        Ok(reminder)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT id, user_id, task_id, scheduled_time, sent_time, delivery_status,
                   delivery_method, retry_count, last_error_message
            FROM reminders
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(reminder)
    }

    pub async fn list_by_task(pool: &SqlitePool, task_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let reminders = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT id, user_id, task_id, scheduled_time, sent_time, delivery_status,
                   delivery_method, retry_count, last_error_message
            FROM reminders
            WHERE task_id = ?
            ORDER BY scheduled_time ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(reminders)
    }

    /// Lists pending reminders scheduled at or before `until`, oldest first
    pub async fn list_due(
        pool: &SqlitePool,
        until: NaiveDateTime,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let reminders = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT id, user_id, task_id, scheduled_time, sent_time, delivery_status,
                   delivery_method, retry_count, last_error_message
            FROM reminders
            WHERE delivery_status = 'pending' AND scheduled_time <= ?
            ORDER BY scheduled_time ASC
            "#,
        )
        .bind(until)
        .fetch_all(pool)
        .await?;

        Ok(reminders)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reminders")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
