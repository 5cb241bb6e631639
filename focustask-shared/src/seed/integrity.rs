/// Consistency checks over committed data
///
/// The schema's foreign keys only prove that referenced rows exist. These
/// queries look for cross-row rules the store does not enforce, such as a
/// task filed under another user's category.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::fmt;
use tracing::debug;

/// A consistency rule broken by rows in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityViolation {
    TaskCategoryOwner {
        task_id: i64,
        user_id: i64,
        category_owner_id: i64,
    },
    RecurringTaskCategoryOwner {
        recurring_task_id: i64,
        user_id: i64,
        category_owner_id: i64,
    },
    ReminderOwner {
        reminder_id: i64,
        user_id: i64,
        task_owner_id: i64,
    },
    MultipleDefaultCategories {
        user_id: i64,
        count: i64,
    },
    SettingsCount {
        user_id: i64,
        count: i64,
    },
    MedicationTiming {
        medication_effect_id: i64,
        user_id: i64,
    },
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TaskCategoryOwner {
                task_id,
                user_id,
                category_owner_id,
            } => write!(
                f,
                "task {task_id} of user {user_id} uses a category of user {category_owner_id}"
            ),
            Self::RecurringTaskCategoryOwner {
                recurring_task_id,
                user_id,
                category_owner_id,
            } => write!(
                f,
                "recurring task {recurring_task_id} of user {user_id} uses a category of user {category_owner_id}"
            ),
            Self::ReminderOwner {
                reminder_id,
                user_id,
                task_owner_id,
            } => write!(
                f,
                "reminder {reminder_id} belongs to user {user_id} but its task belongs to user {task_owner_id}"
            ),
            Self::MultipleDefaultCategories { user_id, count } => {
                write!(f, "user {user_id} has {count} default categories")
            }
            Self::SettingsCount { user_id, count } => {
                write!(f, "user {user_id} has {count} settings rows")
            }
            Self::MedicationTiming {
                medication_effect_id,
                user_id,
            } => write!(
                f,
                "medication record {medication_effect_id} of user {user_id} has inconsistent effect timing"
            ),
        }
    }
}

/// Runs every consistency query and returns the violations found
pub async fn check(pool: &SqlitePool) -> Result<Vec<IntegrityViolation>, sqlx::Error> {
    let mut violations = Vec::new();

    let rows: Vec<(i64, i64, i64)> = sqlx::query_as(
        r#"
        SELECT t.id, t.user_id, c.user_id
        FROM tasks t
        JOIN categories c ON c.id = t.category_id
        WHERE c.user_id <> t.user_id
        ORDER BY t.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    violations.extend(rows.into_iter().map(|(task_id, user_id, category_owner_id)| {
        IntegrityViolation::TaskCategoryOwner {
            task_id,
            user_id,
            category_owner_id,
        }
    }));

    let rows: Vec<(i64, i64, i64)> = sqlx::query_as(
        r#"
        SELECT r.id, r.user_id, c.user_id
        FROM recurring_tasks r
        JOIN categories c ON c.id = r.category_id
        WHERE c.user_id <> r.user_id
        ORDER BY r.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    violations.extend(rows.into_iter().map(
        |(recurring_task_id, user_id, category_owner_id)| {
            IntegrityViolation::RecurringTaskCategoryOwner {
                recurring_task_id,
                user_id,
                category_owner_id,
            }
        },
    ));

    let rows: Vec<(i64, i64, i64)> = sqlx::query_as(
        r#"
        SELECT r.id, r.user_id, t.user_id
        FROM reminders r
        JOIN tasks t ON t.id = r.task_id
        WHERE t.user_id <> r.user_id
        ORDER BY r.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    violations.extend(rows.into_iter().map(|(reminder_id, user_id, task_owner_id)| {
        IntegrityViolation::ReminderOwner {
            reminder_id,
            user_id,
            task_owner_id,
        }
    }));

    let rows: Vec<(i64, i64)> = sqlx::query_as(
        r#"
        SELECT user_id, COUNT(*)
        FROM categories
        WHERE is_default = 1
        GROUP BY user_id
        HAVING COUNT(*) > 1
        ORDER BY user_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    violations.extend(rows.into_iter().map(|(user_id, count)| {
        IntegrityViolation::MultipleDefaultCategories { user_id, count }
    }));

    let rows: Vec<(i64, i64)> = sqlx::query_as(
        r#"
        SELECT u.id, COUNT(s.id)
        FROM users u
        LEFT JOIN user_settings s ON s.user_id = u.id
        GROUP BY u.id
        HAVING COUNT(s.id) <> 1
        ORDER BY u.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    violations.extend(
        rows.into_iter()
            .map(|(user_id, count)| IntegrityViolation::SettingsCount { user_id, count }),
    );

    let rows: Vec<(i64, i64)> = sqlx::query_as(
        r#"
        SELECT id, user_id
        FROM medication_effects
        WHERE (effect_start_time IS NULL) <> (effect_duration_minutes IS NULL)
           OR (is_medication_taken = 0 AND effect_start_time IS NOT NULL)
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    violations.extend(rows.into_iter().map(|(medication_effect_id, user_id)| {
        IntegrityViolation::MedicationTiming {
            medication_effect_id,
            user_id,
        }
    }));

    debug!(violations = violations.len(), "Integrity check finished");

    Ok(violations)
}
