/// Sample data seeding
///
/// This module populates an already migrated database with a fixed,
/// hand-authored dataset: users and their settings, categories, tasks,
/// recurring tasks, reminders and medication effect records.
///
/// # Modules
///
/// - `dataset`: Dataset types, the built-in sample and JSON loading
/// - `validate`: Checks run on a dataset before anything is written
/// - `loader`: Transactional insert of a validated dataset
/// - `integrity`: Consistency queries over the committed data
///
/// # Example
///
/// ```no_run
/// use focustask_shared::db::pool::{create_pool, DatabaseConfig};
/// use focustask_shared::seed::{self, SeedDataset};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: "sqlite://task_manager.db".to_string(),
///     ..Default::default()
/// })
/// .await?;
///
/// let dataset = SeedDataset::sample()?;
/// let report = seed::load(&pool, &dataset).await?;
/// println!("Inserted {} tasks", report.tasks);
/// # Ok(())
/// # }
/// ```

pub mod dataset;
pub mod integrity;
pub mod loader;
pub mod validate;

pub use dataset::SeedDataset;
pub use loader::load;
pub use validate::{validate, ValidationIssue};

use crate::models::{
    category::Category, medication_effect::MedicationEffect, recurring_task::RecurringTask,
    reminder::Reminder, settings::UserSettings, task::Task, user::User,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;

/// Tables written by the seed loader, in insert order
pub const SEED_TABLES: [&str; 7] = [
    "users",
    "user_settings",
    "categories",
    "tasks",
    "recurring_tasks",
    "reminders",
    "medication_effects",
];

/// Seeding errors
#[derive(Error, Debug)]
pub enum SeedError {
    /// The target database has not been migrated
    #[error("database schema is missing tables: {}", .0.join(", "))]
    MissingTables(Vec<String>),

    /// The dataset breaks one or more data rules; nothing was written
    #[error("dataset failed validation with {} issue(s): {}", .0.len(), join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// A row collides with existing data (e.g. the dataset was already loaded)
    #[error("duplicate record: {0}")]
    DuplicateRecord(String),

    /// A reference could not be resolved to an inserted row
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    /// Any other database failure
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The dataset file could not be read
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset file is not valid JSON for a dataset
    #[error("failed to parse dataset: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<sqlx::Error> for SeedError {
    fn from(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                SeedError::DuplicateRecord(db_err.message().to_string())
            }
            _ => SeedError::Database(err),
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Row counts of the seeded tables
///
/// Returned by [`load`] with the number of rows it inserted, and by
/// [`TableCounts::fetch`] with the current table sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub users: i64,
    pub user_settings: i64,
    pub categories: i64,
    pub tasks: i64,
    pub recurring_tasks: i64,
    pub reminders: i64,
    pub medication_effects: i64,
}

/// Per-table insert counts of a successful seed run
pub type SeedReport = TableCounts;

impl TableCounts {
    /// Queries the current row count of every seeded table
    pub async fn fetch(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        Ok(Self {
            users: User::count(pool).await?,
            user_settings: UserSettings::count(pool).await?,
            categories: Category::count(pool).await?,
            tasks: Task::count(pool).await?,
            recurring_tasks: RecurringTask::count(pool).await?,
            reminders: Reminder::count(pool).await?,
            medication_effects: MedicationEffect::count(pool).await?,
        })
    }

    /// Sum over all tables
    pub fn total(&self) -> i64 {
        self.users
            + self.user_settings
            + self.categories
            + self.tasks
            + self.recurring_tasks
            + self.reminders
            + self.medication_effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_counts_total() {
        let counts = TableCounts {
            users: 2,
            user_settings: 2,
            categories: 3,
            tasks: 3,
            recurring_tasks: 2,
            reminders: 2,
            medication_effects: 2,
        };
        assert_eq!(counts.total(), 16);
        assert_eq!(TableCounts::default().total(), 0);
    }

    #[test]
    fn test_missing_tables_message() {
        let err = SeedError::MissingTables(vec!["users".to_string(), "tasks".to_string()]);
        assert_eq!(err.to_string(), "database schema is missing tables: users, tasks");
    }
}
