/// Daily medication effect records
///
/// One row per user and date. When medication was taken, the row records
/// when its effect started and how long it lasts; otherwise both are empty.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE medication_effects (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     date TEXT NOT NULL,               -- YYYY-MM-DD
///     is_effect_mode_on INTEGER NOT NULL DEFAULT 0,
///     is_medication_taken INTEGER NOT NULL DEFAULT 0,
///     effect_start_time TEXT,           -- HH:MM:SS
///     effect_duration_minutes INTEGER,
///     time_to_max_effect_minutes INTEGER,
///     time_to_fade_minutes INTEGER,
///     UNIQUE (user_id, date)
/// );
/// ```

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MedicationEffect {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,

    /// Whether effect-aware scheduling applies on this day
    pub is_effect_mode_on: bool,

    pub is_medication_taken: bool,
    pub effect_start_time: Option<NaiveTime>,
    pub effect_duration_minutes: Option<i32>,
    pub time_to_max_effect_minutes: Option<i32>,
    pub time_to_fade_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicationEffect {
    pub user_id: i64,
    pub date: NaiveDate,
    pub is_effect_mode_on: bool,
    pub is_medication_taken: bool,
    pub effect_start_time: Option<NaiveTime>,
    pub effect_duration_minutes: Option<i32>,
    pub time_to_max_effect_minutes: Option<i32>,
    pub time_to_fade_minutes: Option<i32>,
}

/// Returns true when start time and duration are consistent with the
/// medication flag: both set or both empty, and empty if nothing was taken.
pub fn has_consistent_timing(
    is_medication_taken: bool,
    effect_start_time: Option<NaiveTime>,
    effect_duration_minutes: Option<i32>,
) -> bool {
    match (effect_start_time, effect_duration_minutes) {
        (None, None) => true,
        (Some(_), Some(_)) => is_medication_taken,
        _ => false,
    }
}

impl MedicationEffect {
    /// Start and end of the effect window on this record's date
    ///
    /// `None` when no medication timing was recorded. The end may fall on
    /// the following day.
    pub fn effect_window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let start = self.date.and_time(self.effect_start_time?);
        let minutes = self.effect_duration_minutes?;
        Some((start, start + Duration::minutes(i64::from(minutes))))
    }

    pub async fn create<'e, E>(
        executor: E,
        data: CreateMedicationEffect,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let effect = sqlx::query_as::<_, MedicationEffect>(
            r#"
            INSERT INTO medication_effects (user_id, date, is_effect_mode_on, is_medication_taken,
                                            effect_start_time, effect_duration_minutes,
                                            time_to_max_effect_minutes, time_to_fade_minutes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, date, is_effect_mode_on, is_medication_taken,
                      effect_start_time, effect_duration_minutes,
                      time_to_max_effect_minutes, time_to_fade_minutes
            "#,
        )
        .bind(data.user_id)
        .bind(data.date)
        .bind(data.is_effect_mode_on)
        .bind(data.is_medication_taken)
        .bind(data.effect_start_time)
        .bind(data.effect_duration_minutes)
        .bind(data.time_to_max_effect_minutes)
        .bind(data.time_to_fade_minutes)
        .fetch_one(executor)
        .await?;

        Ok(effect)
    }

    pub async fn find_by_user_and_date(
        pool: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Self>, sqlx::Error> {
        let effect = sqlx::query_as::<_, MedicationEffect>(
            r#"
            SELECT id, user_id, date, is_effect_mode_on, is_medication_taken,
                   effect_start_time, effect_duration_minutes,
                   time_to_max_effect_minutes, time_to_fade_minutes
            FROM medication_effects
            WHERE user_id = ? AND date = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;

        Ok(effect)
    }

    pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let effects = sqlx::query_as::<_, MedicationEffect>(
            r#"
            SELECT id, user_id, date, is_effect_mode_on, is_medication_taken,
                   effect_start_time, effect_duration_minutes,
                   time_to_max_effect_minutes, time_to_fade_minutes
            FROM medication_effects
            WHERE user_id = ?
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(effects)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM medication_effects")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
