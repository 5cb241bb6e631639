/// Recurring task templates
///
/// A recurring task describes a task that repeats on a schedule. The
/// schedule is stored as a compact rule string (see [`RecurrenceRule`]).
/// Turning templates into concrete tasks is the application's job and does
/// not happen here.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE recurring_tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     name TEXT NOT NULL,
///     description TEXT,
///     start_date TEXT NOT NULL,
///     recurrence_rule TEXT NOT NULL,    -- 'daily' | 'weekly:<day>'
///     recurrence_end_date TEXT,
///     category_id INTEGER REFERENCES categories(id),
///     importance TEXT NOT NULL DEFAULT 'medium',
///     estimated_duration_minutes INTEGER,
///     default_reminder_offset_minutes INTEGER,
///     created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```

use super::task::Importance;
use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::fmt;
use std::str::FromStr;

/// Error returned when a recurrence rule string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid recurrence rule: {0:?}")]
pub struct InvalidRecurrenceRule(pub String);

/// How often a recurring task repeats
///
/// Encoded as `daily` or `weekly:<day>` where `<day>` is a three letter
/// lowercase weekday (`mon` .. `sun`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecurrenceRule {
    Daily,
    Weekly(Weekday),
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::Daily => f.write_str("daily"),
            RecurrenceRule::Weekly(day) => write!(f, "weekly:{}", weekday_code(*day)),
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = InvalidRecurrenceRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidRecurrenceRule(s.to_string());

        match s.split_once(':') {
            None if s == "daily" => Ok(RecurrenceRule::Daily),
            Some(("weekly", day)) => {
                let day = [
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                    Weekday::Fri,
                    Weekday::Sat,
                    Weekday::Sun,
                ]
                .into_iter()
                .find(|candidate| weekday_code(*candidate) == day)
                .ok_or_else(invalid)?;
                Ok(RecurrenceRule::Weekly(day))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for RecurrenceRule {
    type Error = InvalidRecurrenceRule;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecurrenceRule> for String {
    fn from(rule: RecurrenceRule) -> Self {
        rule.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecurringTask {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,

    /// Raw rule string; use [`RecurringTask::rule`] for the parsed form
    pub recurrence_rule: String,

    pub recurrence_end_date: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub importance: Importance,
    pub estimated_duration_minutes: Option<i32>,

    /// Lead time for reminders on generated tasks
    pub default_reminder_offset_minutes: Option<i32>,

    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecurringTask {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub recurrence_rule: RecurrenceRule,
    pub recurrence_end_date: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub importance: Importance,
    pub estimated_duration_minutes: Option<i32>,
    pub default_reminder_offset_minutes: Option<i32>,
}

impl RecurringTask {
    /// Parses the stored recurrence rule
    pub fn rule(&self) -> Result<RecurrenceRule, InvalidRecurrenceRule> {
        self.recurrence_rule.parse()
    }

    pub async fn create<'e, E>(executor: E, data: CreateRecurringTask) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let recurring = sqlx::query_as::<_, RecurringTask>(
            r#"
            INSERT INTO recurring_tasks (user_id, name, description, start_date, recurrence_rule,
                                         recurrence_end_date, category_id, importance,
                                         estimated_duration_minutes,
                                         default_reminder_offset_minutes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, name, description, start_date, recurrence_rule,
                      recurrence_end_date, category_id, importance, estimated_duration_minutes,
                      default_reminder_offset_minutes, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.start_date)
        .bind(data.recurrence_rule.to_string())
        .bind(data.recurrence_end_date)
        .bind(data.category_id)
        .bind(data.importance)
        .bind(data.estimated_duration_minutes)
        .bind(data.default_reminder_offset_minutes)
        .fetch_one(executor)
        .await?;

        Ok(recurring)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let recurring = sqlx::query_as::<_, RecurringTask>(
            r#"
            SELECT id, user_id, name, description, start_date, recurrence_rule,
                   recurrence_end_date, category_id, importance, estimated_duration_minutes,
                   default_reminder_offset_minutes, created_at
            FROM recurring_tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(recurring)
    }

    pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let recurring = sqlx::query_as::<_, RecurringTask>(
            r#"
            SELECT id, user_id, name, description, start_date, recurrence_rule,
                   recurrence_end_date, category_id, importance, estimated_duration_minutes,
                   default_reminder_offset_minutes, created_at
            FROM recurring_tasks
            WHERE user_id = ?
            ORDER BY start_date ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(recurring)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recurring_tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
