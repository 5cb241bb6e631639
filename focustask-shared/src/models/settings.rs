/// Per-user display and assistant settings
///
/// Every user owns exactly one settings row (`user_id` is unique).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_settings (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
///     daily_task_limit INTEGER NOT NULL DEFAULT 5,
///     theme_mode TEXT NOT NULL DEFAULT 'default',
///     medication_effect_mode_on INTEGER NOT NULL DEFAULT 0,
///     default_sort_option TEXT NOT NULL DEFAULT 'created_at_desc',
///     ai_aggressiveness_level INTEGER NOT NULL DEFAULT 1
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

/// Highest supported AI aggressiveness level (0 = conservative, 1 = normal, 2 = aggressive)
pub const MAX_AI_AGGRESSIVENESS: i32 = 2;

/// UI theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Default,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Default => "default",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Default ordering of the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Newest first
    #[default]
    CreatedAtDesc,

    /// Earliest due date first
    Deadline,

    /// Lowest hurdle first
    Hurdle,

    /// Highest importance first
    Importance,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::CreatedAtDesc => "created_at_desc",
            SortOption::Deadline => "deadline",
            SortOption::Hurdle => "hurdle",
            SortOption::Importance => "importance",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSettings {
    pub id: i64,
    pub user_id: i64,

    /// Number of tasks the user wants to plan per day
    pub daily_task_limit: i32,

    pub theme_mode: ThemeMode,

    /// Whether medication-effect aware display is switched on
    pub medication_effect_mode_on: bool,

    pub default_sort_option: SortOption,

    /// 0 = conservative, 1 = normal, 2 = aggressive
    pub ai_aggressiveness_level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserSettings {
    pub user_id: i64,
    pub daily_task_limit: i32,
    pub theme_mode: ThemeMode,
    pub medication_effect_mode_on: bool,
    pub default_sort_option: SortOption,
    pub ai_aggressiveness_level: i32,
}

impl UserSettings {
    /// Inserts the settings row for a user
    ///
    /// Fails with a unique violation if the user already has settings.
    pub async fn create<'e, E>(executor: E, data: CreateUserSettings) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let settings = sqlx::query_as::<_, UserSettings>(
            r#"
            INSERT INTO user_settings (user_id, daily_task_limit, theme_mode,
                                       medication_effect_mode_on, default_sort_option,
                                       ai_aggressiveness_level)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, daily_task_limit, theme_mode, medication_effect_mode_on,
                      default_sort_option, ai_aggressiveness_level
            "#,
        )
        .bind(data.user_id)
        .bind(data.daily_task_limit)
        .bind(data.theme_mode)
        .bind(data.medication_effect_mode_on)
        .bind(data.default_sort_option)
        .bind(data.ai_aggressiveness_level)
        .fetch_one(executor)
        .await?;

        Ok(settings)
    }

    pub async fn find_by_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let settings = sqlx::query_as::<_, UserSettings>(
            r#"
            SELECT id, user_id, daily_task_limit, theme_mode, medication_effect_mode_on,
                   default_sort_option, ai_aggressiveness_level
            FROM user_settings
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(settings)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_settings")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
