/// Transactional dataset loader
///
/// Rows are inserted in foreign-key order inside one transaction. Ids
/// returned by each insert are collected into lookup tables keyed by the
/// dataset's natural keys, and later rows resolve their references through
/// them. If any insert fails the transaction is dropped, which rolls back
/// every row written so far.

use super::{
    dataset::{CategoryRef, SeedDataset, TaskRef},
    validate::validate,
    SeedError, SeedReport, SEED_TABLES,
};
use crate::db::migrations::missing_tables;
use crate::models::{
    category::{Category, CreateCategory},
    medication_effect::{CreateMedicationEffect, MedicationEffect},
    recurring_task::{CreateRecurringTask, RecurringTask},
    reminder::{CreateReminder, Reminder},
    settings::{CreateUserSettings, UserSettings},
    task::{CreateTask, Task},
    user::{CreateUser, User},
};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Loads a dataset into an already migrated database
///
/// # Errors
///
/// - [`SeedError::MissingTables`] if any seeded table does not exist
/// - [`SeedError::Validation`] if the dataset breaks a data rule
/// - [`SeedError::DuplicateRecord`] if a row collides with existing data,
///   for example when the dataset was loaded before
/// - [`SeedError::Database`] for any other database failure
///
/// Nothing is written unless the whole dataset is inserted.
pub async fn load(pool: &SqlitePool, dataset: &SeedDataset) -> Result<SeedReport, SeedError> {
    let missing = missing_tables(pool, &SEED_TABLES).await?;
    if !missing.is_empty() {
        warn!(tables = ?missing, "Database schema is incomplete");
        return Err(SeedError::MissingTables(missing));
    }

    let issues = validate(dataset);
    if !issues.is_empty() {
        warn!(issues = issues.len(), "Seed dataset failed validation");
        return Err(SeedError::Validation(issues));
    }

    info!(rows = dataset.row_count(), "Seeding database");

    let mut tx = pool.begin().await?;
    let report = insert_all(&mut *tx, dataset).await?;
    tx.commit().await?;

    info!(
        users = report.users,
        tasks = report.tasks,
        total = report.total(),
        "Seed data committed"
    );

    Ok(report)
}

fn lookup<K, Q>(
    ids: &HashMap<K, i64>,
    key: &Q,
    describe: impl FnOnce() -> String,
) -> Result<i64, SeedError>
where
    K: std::borrow::Borrow<Q> + std::hash::Hash + Eq,
    Q: std::hash::Hash + Eq + ?Sized,
{
    ids.get(key)
        .copied()
        .ok_or_else(|| SeedError::UnresolvedReference(describe()))
}

fn user_id(users: &HashMap<String, i64>, email: &str) -> Result<i64, SeedError> {
    lookup(users, email, || format!("user {email}"))
}

fn category_id(
    categories: &HashMap<CategoryRef, i64>,
    category: Option<&CategoryRef>,
) -> Result<Option<i64>, SeedError> {
    category
        .map(|c| lookup(categories, c, || format!("category {} of {}", c.name, c.user)))
        .transpose()
}

fn task_id(tasks: &HashMap<TaskRef, i64>, task: &TaskRef) -> Result<i64, SeedError> {
    lookup(tasks, task, || format!("task {} of {}", task.name, task.user))
}

async fn insert_all(
    conn: &mut SqliteConnection,
    dataset: &SeedDataset,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    let mut users = HashMap::new();
    for user in &dataset.users {
        let created = User::create(
            &mut *conn,
            CreateUser {
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                name: user.name.clone(),
                auth_provider: user.auth_provider,
                google_sub_id: user.google_sub_id.clone(),
                apple_sub_id: user.apple_sub_id.clone(),
            },
        )
        .await?;
        debug!(user_id = created.id, email = %created.email, "Inserted user");
        users.insert(created.email, created.id);
        report.users += 1;
    }

    for settings in &dataset.settings {
        UserSettings::create(
            &mut *conn,
            CreateUserSettings {
                user_id: user_id(&users, &settings.user)?,
                daily_task_limit: settings.daily_task_limit,
                theme_mode: settings.theme_mode,
                medication_effect_mode_on: settings.medication_effect_mode_on,
                default_sort_option: settings.default_sort_option,
                ai_aggressiveness_level: settings.ai_aggressiveness_level,
            },
        )
        .await?;
        report.user_settings += 1;
    }

    let mut categories = HashMap::new();
    for category in &dataset.categories {
        let created = Category::create(
            &mut *conn,
            CreateCategory {
                user_id: user_id(&users, &category.user)?,
                name: category.name.clone(),
                color: category.color.clone(),
                is_default: category.is_default,
            },
        )
        .await?;
        categories.insert(category.key(), created.id);
        report.categories += 1;
    }

    let mut tasks = HashMap::new();
    for task in &dataset.tasks {
        let created = Task::create(
            &mut *conn,
            CreateTask {
                user_id: user_id(&users, &task.user)?,
                name: task.name.clone(),
                description: task.description.clone(),
                due_date: task.due_date,
                importance: task.importance,
                estimated_duration_minutes: task.estimated_duration_minutes,
                progress: task.progress,
                category_id: category_id(&categories, task.category.as_ref())?,
                is_today_task: task.is_today_task,
                status: task.status,
                suggested_by_ai: task.suggested_by_ai,
                priority_score: task.priority_score,
                hurdle_level: task.hurdle_level,
                parent_recurring_task_id: None,
            },
        )
        .await?;
        debug!(task_id = created.id, name = %created.name, "Inserted task");
        tasks.insert(task.key(), created.id);
        report.tasks += 1;
    }

    for recurring in &dataset.recurring_tasks {
        RecurringTask::create(
            &mut *conn,
            CreateRecurringTask {
                user_id: user_id(&users, &recurring.user)?,
                name: recurring.name.clone(),
                description: recurring.description.clone(),
                start_date: recurring.start_date,
                recurrence_rule: recurring.recurrence_rule,
                recurrence_end_date: recurring.recurrence_end_date,
                category_id: category_id(&categories, recurring.category.as_ref())?,
                importance: recurring.importance,
                estimated_duration_minutes: recurring.estimated_duration_minutes,
                default_reminder_offset_minutes: recurring.default_reminder_offset_minutes,
            },
        )
        .await?;
        report.recurring_tasks += 1;
    }

    for reminder in &dataset.reminders {
        Reminder::create(
            &mut *conn,
            CreateReminder {
                user_id: user_id(&users, &reminder.user)?,
                task_id: task_id(&tasks, &reminder.task)?,
                scheduled_time: reminder.scheduled_time,
                delivery_status: reminder.delivery_status,
                delivery_method: reminder.delivery_method,
                retry_count: reminder.retry_count,
            },
        )
        .await?;
        report.reminders += 1;
    }

    for effect in &dataset.medication_effects {
        MedicationEffect::create(
            &mut *conn,
            CreateMedicationEffect {
                user_id: user_id(&users, &effect.user)?,
                date: effect.date,
                is_effect_mode_on: effect.is_effect_mode_on,
                is_medication_taken: effect.is_medication_taken,
                effect_start_time: effect.effect_start_time,
                effect_duration_minutes: effect.effect_duration_minutes,
                time_to_max_effect_minutes: effect.time_to_max_effect_minutes,
                time_to_fade_minutes: effect.time_to_fade_minutes,
            },
        )
        .await?;
        report.medication_effects += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_user_reference() {
        let users = HashMap::from([("user1@example.com".to_string(), 1)]);

        assert_eq!(user_id(&users, "user1@example.com").unwrap(), 1);
        let err = user_id(&users, "ghost@example.com").unwrap_err();
        assert_eq!(err.to_string(), "unresolved reference: user ghost@example.com");
    }

    #[test]
    fn test_absent_category_resolves_to_none() {
        let categories = HashMap::new();
        assert_eq!(category_id(&categories, None).unwrap(), None);
    }
}
