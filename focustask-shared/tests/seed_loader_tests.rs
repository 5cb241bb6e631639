/// Integration tests for loading seed datasets

mod common;

use chrono::{NaiveDate, NaiveTime};
use focustask_shared::db::pool::close_pool;
use focustask_shared::models::{
    category::Category,
    medication_effect::MedicationEffect,
    recurring_task::RecurringTask,
    reminder::Reminder,
    task::Task,
    user::{AuthProvider, User},
};
use focustask_shared::seed::{
    self,
    integrity::{self, IntegrityViolation},
    SeedDataset, SeedError, TableCounts, ValidationIssue,
};

fn sample() -> SeedDataset {
    SeedDataset::sample().expect("Sample dataset should parse")
}

#[tokio::test]
async fn test_load_sample_inserts_every_row() {
    let db = common::migrated_db().await;

    let report = seed::load(&db.pool, &sample()).await.expect("Seeding failed");

    let expected = TableCounts {
        users: 2,
        user_settings: 2,
        categories: 3,
        tasks: 3,
        recurring_tasks: 2,
        reminders: 2,
        medication_effects: 2,
    };
    assert_eq!(report, expected);
    assert_eq!(TableCounts::fetch(&db.pool).await.unwrap(), expected);

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_task_categories_belong_to_task_owner() {
    let db = common::migrated_db().await;
    seed::load(&db.pool, &sample()).await.unwrap();

    let users = User::list(&db.pool, 10, 0).await.unwrap();
    let mut checked = 0;
    for user in &users {
        for task in Task::list_by_user(&db.pool, user.id).await.unwrap() {
            let category_id = task.category_id.expect("Every sample task has a category");
            let category = Category::find_by_id(&db.pool, category_id)
                .await
                .unwrap()
                .expect("Category should exist");
            assert_eq!(category.user_id, task.user_id);
            checked += 1;
        }
    }
    assert_eq!(checked, 3);

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_reminders_belong_to_task_owner() {
    let db = common::migrated_db().await;
    seed::load(&db.pool, &sample()).await.unwrap();

    let until = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let reminders = Reminder::list_due(&db.pool, until).await.unwrap();
    assert_eq!(reminders.len(), 2);

    for reminder in reminders {
        let task = Task::find_by_id(&db.pool, reminder.task_id).await.unwrap().unwrap();
        assert_eq!(reminder.user_id, task.user_id);
    }

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_seeded_local_user() {
    let db = common::migrated_db().await;
    seed::load(&db.pool, &sample()).await.unwrap();

    let user = User::find_by_email(&db.pool, "user1@example.com")
        .await
        .unwrap()
        .expect("user1 should exist");

    assert_eq!(user.password_hash.as_deref(), Some("hashed_password_1"));
    assert_eq!(user.name.as_deref(), Some("中村彦一郎"));
    assert_eq!(user.auth_provider, AuthProvider::Email);
    assert_eq!(user.external_subject_id(), None);
    assert!(user.last_login_at.is_none());

    let google = User::find_by_email(&db.pool, "user2@example.com").await.unwrap().unwrap();
    assert_eq!(google.external_subject_id(), Some("google_sub_123"));

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_seeded_medication_effect() {
    let db = common::migrated_db().await;
    seed::load(&db.pool, &sample()).await.unwrap();

    let user = User::find_by_email(&db.pool, "user1@example.com").await.unwrap().unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let effect = MedicationEffect::find_by_user_and_date(&db.pool, user.id, date)
        .await
        .unwrap()
        .expect("Medication record should exist");

    assert!(effect.is_effect_mode_on);
    assert!(effect.is_medication_taken);
    assert_eq!(effect.effect_start_time, NaiveTime::from_hms_opt(9, 0, 0));
    assert_eq!(effect.effect_duration_minutes, Some(240));

    let other = User::find_by_email(&db.pool, "user2@example.com").await.unwrap().unwrap();
    let effects = MedicationEffect::list_by_user(&db.pool, other.id).await.unwrap();
    assert_eq!(effects.len(), 1);
    assert!(!effects[0].is_medication_taken);
    assert!(effects[0].effect_window().is_none());

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_rerun_reports_duplicate_and_keeps_counts() {
    let db = common::migrated_db().await;
    seed::load(&db.pool, &sample()).await.unwrap();
    let before = TableCounts::fetch(&db.pool).await.unwrap();

    let err = seed::load(&db.pool, &sample()).await.unwrap_err();
    assert!(matches!(err, SeedError::DuplicateRecord(_)), "Unexpected error: {err}");

    assert_eq!(TableCounts::fetch(&db.pool).await.unwrap(), before);

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_failure_mid_batch_rolls_back() {
    let db = common::migrated_db().await;

    // Only the second user collides, after the first has been inserted
    let mut existing = sample();
    existing.users.remove(0);
    existing.settings.remove(0);
    existing.categories.retain(|c| c.user == "user2@example.com");
    existing.tasks.retain(|t| t.user == "user2@example.com");
    existing.recurring_tasks.retain(|r| r.user == "user2@example.com");
    existing.reminders.clear();
    existing.medication_effects.retain(|m| m.user == "user2@example.com");
    seed::load(&db.pool, &existing).await.unwrap();
    let before = TableCounts::fetch(&db.pool).await.unwrap();
    assert_eq!(before.users, 1);

    let err = seed::load(&db.pool, &sample()).await.unwrap_err();
    assert!(matches!(err, SeedError::DuplicateRecord(_)));

    assert_eq!(TableCounts::fetch(&db.pool).await.unwrap(), before);
    assert!(User::find_by_email(&db.pool, "user1@example.com").await.unwrap().is_none());

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_missing_schema_is_rejected() {
    let db = common::empty_db().await;

    let err = seed::load(&db.pool, &sample()).await.unwrap_err();
    match err {
        SeedError::MissingTables(tables) => assert_eq!(tables.len(), seed::SEED_TABLES.len()),
        other => panic!("Expected MissingTables, got {other}"),
    }

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_invalid_dataset_writes_nothing() {
    let db = common::migrated_db().await;

    let mut dataset = sample();
    dataset.reminders[0].user = "user2@example.com".to_string();

    let err = seed::load(&db.pool, &dataset).await.unwrap_err();
    match err {
        SeedError::Validation(issues) => {
            assert_eq!(issues.len(), 1);
            assert!(matches!(issues[0], ValidationIssue::ReminderOwnerMismatch { .. }));
        }
        other => panic!("Expected Validation, got {other}"),
    }

    assert_eq!(TableCounts::fetch(&db.pool).await.unwrap().total(), 0);

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_integrity_check_passes_for_sample() {
    let db = common::migrated_db().await;
    seed::load(&db.pool, &sample()).await.unwrap();

    let violations = integrity::check(&db.pool).await.unwrap();
    assert!(violations.is_empty(), "Unexpected violations: {:?}", violations);

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_integrity_check_detects_cross_user_rows() {
    let db = common::migrated_db().await;
    seed::load(&db.pool, &sample()).await.unwrap();

    let user1 = User::find_by_email(&db.pool, "user1@example.com").await.unwrap().unwrap();
    let user2 = User::find_by_email(&db.pool, "user2@example.com").await.unwrap().unwrap();
    let foreign = Category::find_default_for_user(&db.pool, user2.id)
        .await
        .unwrap()
        .expect("user2 has a default category");

    let task = Task::list_by_user(&db.pool, user1.id).await.unwrap().remove(0);
    sqlx::query("UPDATE tasks SET category_id = ? WHERE id = ?")
        .bind(foreign.id)
        .bind(task.id)
        .execute(&db.pool)
        .await
        .unwrap();

    let recurring = RecurringTask::list_by_user(&db.pool, user1.id).await.unwrap().remove(0);
    sqlx::query("UPDATE recurring_tasks SET category_id = ? WHERE id = ?")
        .bind(foreign.id)
        .bind(recurring.id)
        .execute(&db.pool)
        .await
        .unwrap();

    let reminder = Reminder::list_by_task(&db.pool, task.id).await.unwrap().remove(0);
    sqlx::query("UPDATE reminders SET user_id = ? WHERE id = ?")
        .bind(user2.id)
        .bind(reminder.id)
        .execute(&db.pool)
        .await
        .unwrap();

    sqlx::query("DELETE FROM user_settings WHERE user_id = ?")
        .bind(user2.id)
        .execute(&db.pool)
        .await
        .unwrap();

    let violations = integrity::check(&db.pool).await.unwrap();
    assert_eq!(
        violations,
        vec![
            IntegrityViolation::TaskCategoryOwner {
                task_id: task.id,
                user_id: user1.id,
                category_owner_id: user2.id,
            },
            IntegrityViolation::RecurringTaskCategoryOwner {
                recurring_task_id: recurring.id,
                user_id: user1.id,
                category_owner_id: user2.id,
            },
            IntegrityViolation::ReminderOwner {
                reminder_id: reminder.id,
                user_id: user2.id,
                task_owner_id: user1.id,
            },
            IntegrityViolation::SettingsCount {
                user_id: user2.id,
                count: 0,
            },
        ]
    );

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_load_dataset_from_json_file() {
    let db = common::migrated_db().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.json");
    tokio::fs::write(
        &path,
        r##"{
            "users": [
                { "email": "apple@example.com", "auth_provider": "apple", "apple_sub_id": "apple_sub_9" }
            ],
            "settings": [
                { "user": "apple@example.com", "daily_task_limit": 4, "ai_aggressiveness_level": 2 }
            ],
            "categories": [
                { "user": "apple@example.com", "name": "Inbox", "color": "#333", "is_default": true }
            ],
            "tasks": [
                { "user": "apple@example.com", "name": "Plan week", "is_today_task": true,
                  "category": { "user": "apple@example.com", "name": "Inbox" } }
            ]
        }"##,
    )
    .await
    .unwrap();

    let dataset = SeedDataset::from_json_file(&path).await.unwrap();
    let report = seed::load(&db.pool, &dataset).await.unwrap();
    assert_eq!(report.total(), 4);

    let user = User::find_by_email(&db.pool, "apple@example.com").await.unwrap().unwrap();
    assert_eq!(user.external_subject_id(), Some("apple_sub_9"));

    let today = Task::list_today(&db.pool, user.id).await.unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].progress, 0);

    close_pool(db.pool).await;
}

#[tokio::test]
async fn test_missing_dataset_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SeedDataset::from_json_file(dir.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::Io(_)));
}
