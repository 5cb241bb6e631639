/// Seed dataset types
///
/// A dataset mirrors the seven seeded tables, but rows refer to each other
/// by natural keys instead of ids: users by email, categories and tasks by
/// owner email plus name. The loader resolves these keys to the ids
/// returned by each insert.
///
/// The built-in sample is embedded from `sample_dataset.json`; datasets of
/// the same shape can be loaded from disk with
/// [`SeedDataset::from_json_file`].

use super::SeedError;
use crate::models::{
    recurring_task::RecurrenceRule,
    reminder::{DeliveryMethod, DeliveryStatus},
    settings::{SortOption, ThemeMode},
    task::{Importance, TaskStatus},
    user::AuthProvider,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// JSON source of the built-in sample dataset
pub const SAMPLE_DATASET_JSON: &str = include_str!("sample_dataset.json");

/// A complete set of rows to seed, grouped by table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedDataset {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub settings: Vec<SeedSettings>,
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub tasks: Vec<SeedTask>,
    #[serde(default)]
    pub recurring_tasks: Vec<SeedRecurringTask>,
    #[serde(default)]
    pub reminders: Vec<SeedReminder>,
    #[serde(default)]
    pub medication_effects: Vec<SeedMedicationEffect>,
}

/// Reference to a category by owner email and category name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryRef {
    pub user: String,
    pub name: String,
}

/// Reference to a task by owner email and task name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskRef {
    pub user: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SeedUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    pub password_hash: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    pub auth_provider: AuthProvider,

    #[serde(default)]
    pub google_sub_id: Option<String>,

    #[serde(default)]
    pub apple_sub_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SeedSettings {
    /// Owner email
    pub user: String,

    #[validate(range(min = 1, message = "Daily task limit must be positive"))]
    pub daily_task_limit: i32,

    #[serde(default)]
    pub theme_mode: ThemeMode,

    #[serde(default)]
    pub medication_effect_mode_on: bool,

    #[serde(default)]
    pub default_sort_option: SortOption,

    #[validate(range(min = 0, max = 2, message = "AI aggressiveness must be between 0 and 2"))]
    pub ai_aggressiveness_level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SeedCategory {
    /// Owner email
    pub user: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    pub color: String,

    #[serde(default)]
    pub is_default: bool,
}

impl SeedCategory {
    pub fn key(&self) -> CategoryRef {
        CategoryRef {
            user: self.user.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SeedTask {
    /// Owner email
    pub user: String,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub importance: Importance,

    #[serde(default)]
    #[validate(range(min = 1, message = "Estimated duration must be positive"))]
    pub estimated_duration_minutes: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: i32,

    #[serde(default)]
    pub category: Option<CategoryRef>,

    #[serde(default)]
    pub is_today_task: bool,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub suggested_by_ai: bool,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0, message = "Priority score must be between 0 and 1"))]
    pub priority_score: f64,

    #[serde(default)]
    #[validate(range(min = 1, max = 3, message = "Hurdle level must be between 1 and 3"))]
    pub hurdle_level: Option<i32>,
}

impl SeedTask {
    pub fn key(&self) -> TaskRef {
        TaskRef {
            user: self.user.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SeedRecurringTask {
    /// Owner email
    pub user: String,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub start_date: NaiveDate,

    pub recurrence_rule: RecurrenceRule,

    #[serde(default)]
    pub recurrence_end_date: Option<NaiveDate>,

    #[serde(default)]
    pub category: Option<CategoryRef>,

    #[serde(default)]
    pub importance: Importance,

    #[serde(default)]
    #[validate(range(min = 1, message = "Estimated duration must be positive"))]
    pub estimated_duration_minutes: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Reminder offset must not be negative"))]
    pub default_reminder_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SeedReminder {
    /// Owner email; must match the task's owner
    pub user: String,

    pub task: TaskRef,

    pub scheduled_time: NaiveDateTime,

    #[serde(default)]
    pub delivery_status: DeliveryStatus,

    #[serde(default)]
    pub delivery_method: DeliveryMethod,

    #[serde(default)]
    #[validate(range(min = 0, message = "Retry count must not be negative"))]
    pub retry_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SeedMedicationEffect {
    /// Owner email
    pub user: String,

    pub date: NaiveDate,

    #[serde(default)]
    pub is_effect_mode_on: bool,

    #[serde(default)]
    pub is_medication_taken: bool,

    #[serde(default)]
    pub effect_start_time: Option<NaiveTime>,

    #[serde(default)]
    #[validate(range(min = 1, max = 1440, message = "Effect duration must be 1-1440 minutes"))]
    pub effect_duration_minutes: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Time to max effect must not be negative"))]
    pub time_to_max_effect_minutes: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Time to fade must not be negative"))]
    pub time_to_fade_minutes: Option<i32>,
}

impl SeedDataset {
    /// The built-in sample: two users with their settings, three
    /// categories, three tasks, two recurring tasks, two reminders and two
    /// medication effect records
    pub fn sample() -> Result<Self, SeedError> {
        Self::from_json_str(SAMPLE_DATASET_JSON)
    }

    /// Parses a dataset from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        let dataset: SeedDataset = serde_json::from_str(json)?;
        debug!(rows = dataset.row_count(), "Parsed seed dataset");
        Ok(dataset)
    }

    /// Reads and parses a JSON dataset file
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading seed dataset");
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&json)
    }

    /// Total number of rows across all tables
    pub fn row_count(&self) -> usize {
        self.users.len()
            + self.settings.len()
            + self.categories.len()
            + self.tasks.len()
            + self.recurring_tasks.len()
            + self.reminders.len()
            + self.medication_effects.len()
    }
}
