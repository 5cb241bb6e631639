/// Dataset validation
///
/// Every rule is checked up front so that a bad dataset is rejected before
/// the loader opens its transaction. Validation never stops at the first
/// problem: the full list of issues is returned.

use super::dataset::{CategoryRef, SeedDataset, TaskRef};
use crate::models::{
    category::is_hex_color, medication_effect::has_consistent_timing, user::AuthProvider,
};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use validator::Validate;

/// A single data rule broken by a dataset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Field-level rule from the dataset record's `validator` attributes
    #[error("{record}: {message}")]
    InvalidField { record: String, message: String },

    #[error("email {0} is used by more than one user")]
    DuplicateEmail(String),

    /// The subject id columns don't match the auth provider
    #[error("user {email}: subject ids do not match auth provider {provider}")]
    SubjectIdMismatch { email: String, provider: String },

    #[error("{record} refers to unknown user {email}")]
    UnknownUser { record: String, email: String },

    #[error("user {0} has no settings record")]
    MissingSettings(String),

    #[error("user {0} has more than one settings record")]
    DuplicateSettings(String),

    #[error("category {name} of {user}: {color:?} is not a hex color")]
    InvalidColor { user: String, name: String, color: String },

    #[error("user {user} has more than one category named {name}")]
    DuplicateCategory { user: String, name: String },

    #[error("user {0} has more than one default category")]
    MultipleDefaultCategories(String),

    #[error("{record} refers to unknown category {name} of {user}")]
    UnknownCategory { record: String, user: String, name: String },

    #[error("{record} uses category {name} owned by {owner}")]
    CategoryOwnerMismatch { record: String, name: String, owner: String },

    #[error("user {user} has more than one task named {name}")]
    DuplicateTask { user: String, name: String },

    #[error("{record} refers to unknown task {name} of {user}")]
    UnknownTask { record: String, user: String, name: String },

    #[error("reminder for task {task} of {task_owner} is assigned to {user}")]
    ReminderOwnerMismatch { user: String, task: String, task_owner: String },

    #[error("recurring task {name} of {user} ends before it starts")]
    RecurrenceEndsBeforeStart { user: String, name: String },

    #[error("user {user} has more than one medication record on {date}")]
    DuplicateMedicationDate { user: String, date: NaiveDate },

    /// Start time and duration must both be set or both be empty, and empty
    /// when no medication was taken
    #[error("medication record of {user} on {date} has inconsistent effect timing")]
    InconsistentEffectTiming { user: String, date: NaiveDate },
}

/// Checks a dataset against every data rule
///
/// Returns an empty list when the dataset can be loaded.
pub fn validate(dataset: &SeedDataset) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let emails = check_users(dataset, &mut issues);
    check_settings(dataset, &emails, &mut issues);
    let categories = check_categories(dataset, &emails, &mut issues);
    let tasks = check_tasks(dataset, &emails, &categories, &mut issues);
    check_recurring_tasks(dataset, &emails, &categories, &mut issues);
    check_reminders(dataset, &emails, &tasks, &mut issues);
    check_medication_effects(dataset, &emails, &mut issues);

    issues
}

fn field_issues(record: String, item: &impl Validate, issues: &mut Vec<ValidationIssue>) {
    if let Err(errors) = item.validate() {
        issues.push(ValidationIssue::InvalidField {
            record,
            message: errors.to_string(),
        });
    }
}

fn check_user_ref(
    record: &str,
    email: &str,
    emails: &HashSet<&str>,
    issues: &mut Vec<ValidationIssue>,
) {
    if !emails.contains(email) {
        issues.push(ValidationIssue::UnknownUser {
            record: record.to_string(),
            email: email.to_string(),
        });
    }
}

/// Resolves an optional category reference, flagging unknown categories and
/// categories owned by someone other than `owner`
fn check_category_ref(
    record: &str,
    owner: &str,
    category: Option<&CategoryRef>,
    categories: &HashSet<CategoryRef>,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(category) = category else {
        return;
    };

    if !categories.contains(category) {
        issues.push(ValidationIssue::UnknownCategory {
            record: record.to_string(),
            user: category.user.clone(),
            name: category.name.clone(),
        });
    } else if category.user != owner {
        issues.push(ValidationIssue::CategoryOwnerMismatch {
            record: record.to_string(),
            name: category.name.clone(),
            owner: category.user.clone(),
        });
    }
}

fn check_users<'a>(
    dataset: &'a SeedDataset,
    issues: &mut Vec<ValidationIssue>,
) -> HashSet<&'a str> {
    let mut emails = HashSet::new();

    for user in &dataset.users {
        field_issues(format!("user {}", user.email), user, issues);

        if !emails.insert(user.email.as_str()) {
            issues.push(ValidationIssue::DuplicateEmail(user.email.clone()));
        }

        let ids = (user.google_sub_id.is_some(), user.apple_sub_id.is_some());
        let consistent = match user.auth_provider {
            AuthProvider::Email => ids == (false, false),
            AuthProvider::Google => ids == (true, false),
            AuthProvider::Apple => ids == (false, true),
        };
        if !consistent {
            issues.push(ValidationIssue::SubjectIdMismatch {
                email: user.email.clone(),
                provider: user.auth_provider.as_str().to_string(),
            });
        }
    }

    emails
}

fn check_settings(
    dataset: &SeedDataset,
    emails: &HashSet<&str>,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut per_user: HashMap<&str, usize> = HashMap::new();

    for settings in &dataset.settings {
        let record = format!("settings of {}", settings.user);
        field_issues(record.clone(), settings, issues);
        check_user_ref(&record, &settings.user, emails, issues);
        *per_user.entry(settings.user.as_str()).or_default() += 1;
    }

    for user in &dataset.users {
        match per_user.get(user.email.as_str()).copied().unwrap_or(0) {
            0 => issues.push(ValidationIssue::MissingSettings(user.email.clone())),
            1 => {}
            _ => issues.push(ValidationIssue::DuplicateSettings(user.email.clone())),
        }
    }
}

fn check_categories(
    dataset: &SeedDataset,
    emails: &HashSet<&str>,
    issues: &mut Vec<ValidationIssue>,
) -> HashSet<CategoryRef> {
    let mut categories = HashSet::new();
    let mut defaults: HashMap<&str, usize> = HashMap::new();

    for category in &dataset.categories {
        let record = format!("category {} of {}", category.name, category.user);
        field_issues(record.clone(), category, issues);
        check_user_ref(&record, &category.user, emails, issues);

        if !is_hex_color(&category.color) {
            issues.push(ValidationIssue::InvalidColor {
                user: category.user.clone(),
                name: category.name.clone(),
                color: category.color.clone(),
            });
        }

        if !categories.insert(category.key()) {
            issues.push(ValidationIssue::DuplicateCategory {
                user: category.user.clone(),
                name: category.name.clone(),
            });
        }

        if category.is_default {
            let count = defaults.entry(category.user.as_str()).or_default();
            *count += 1;
            if *count == 2 {
                issues.push(ValidationIssue::MultipleDefaultCategories(category.user.clone()));
            }
        }
    }

    categories
}

fn check_tasks(
    dataset: &SeedDataset,
    emails: &HashSet<&str>,
    categories: &HashSet<CategoryRef>,
    issues: &mut Vec<ValidationIssue>,
) -> HashSet<TaskRef> {
    let mut tasks = HashSet::new();

    for task in &dataset.tasks {
        let record = format!("task {} of {}", task.name, task.user);
        field_issues(record.clone(), task, issues);
        check_user_ref(&record, &task.user, emails, issues);
        check_category_ref(&record, &task.user, task.category.as_ref(), categories, issues);

        if !tasks.insert(task.key()) {
            issues.push(ValidationIssue::DuplicateTask {
                user: task.user.clone(),
                name: task.name.clone(),
            });
        }
    }

    tasks
}

fn check_recurring_tasks(
    dataset: &SeedDataset,
    emails: &HashSet<&str>,
    categories: &HashSet<CategoryRef>,
    issues: &mut Vec<ValidationIssue>,
) {
    for recurring in &dataset.recurring_tasks {
        let record = format!("recurring task {} of {}", recurring.name, recurring.user);
        field_issues(record.clone(), recurring, issues);
        check_user_ref(&record, &recurring.user, emails, issues);
        check_category_ref(
            &record,
            &recurring.user,
            recurring.category.as_ref(),
            categories,
            issues,
        );

        if matches!(recurring.recurrence_end_date, Some(end) if end < recurring.start_date) {
            issues.push(ValidationIssue::RecurrenceEndsBeforeStart {
                user: recurring.user.clone(),
                name: recurring.name.clone(),
            });
        }
    }
}

fn check_reminders(
    dataset: &SeedDataset,
    emails: &HashSet<&str>,
    tasks: &HashSet<TaskRef>,
    issues: &mut Vec<ValidationIssue>,
) {
    for reminder in &dataset.reminders {
        let record = format!(
            "reminder for task {} at {}",
            reminder.task.name, reminder.scheduled_time
        );
        field_issues(record.clone(), reminder, issues);
        check_user_ref(&record, &reminder.user, emails, issues);

        if !tasks.contains(&reminder.task) {
            issues.push(ValidationIssue::UnknownTask {
                record,
                user: reminder.task.user.clone(),
                name: reminder.task.name.clone(),
            });
        } else if reminder.task.user != reminder.user {
            issues.push(ValidationIssue::ReminderOwnerMismatch {
                user: reminder.user.clone(),
                task: reminder.task.name.clone(),
                task_owner: reminder.task.user.clone(),
            });
        }
    }
}

fn check_medication_effects(
    dataset: &SeedDataset,
    emails: &HashSet<&str>,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut days = HashSet::new();

    for effect in &dataset.medication_effects {
        let record = format!("medication record of {} on {}", effect.user, effect.date);
        field_issues(record.clone(), effect, issues);
        check_user_ref(&record, &effect.user, emails, issues);

        if !days.insert((effect.user.as_str(), effect.date)) {
            issues.push(ValidationIssue::DuplicateMedicationDate {
                user: effect.user.clone(),
                date: effect.date,
            });
        }

        if !has_consistent_timing(
            effect.is_medication_taken,
            effect.effect_start_time,
            effect.effect_duration_minutes,
        ) {
            issues.push(ValidationIssue::InconsistentEffectTiming {
                user: effect.user.clone(),
                date: effect.date,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::dataset::SeedCategory;
    use chrono::NaiveTime;

    fn sample() -> SeedDataset {
        SeedDataset::sample().unwrap()
    }

    #[test]
    fn test_sample_is_valid() {
        assert_eq!(validate(&sample()), Vec::new());
    }

    #[test]
    fn test_empty_dataset_is_valid() {
        assert!(validate(&SeedDataset::default()).is_empty());
    }

    #[test]
    fn test_duplicate_email() {
        let mut dataset = sample();
        let mut copy = dataset.users[0].clone();
        copy.name = Some("別人".to_string());
        dataset.users.push(copy);

        assert_eq!(
            validate(&dataset),
            vec![ValidationIssue::DuplicateEmail("user1@example.com".to_string())]
        );
    }

    #[test]
    fn test_duplicate_settings() {
        let mut dataset = sample();
        let copy = dataset.settings[0].clone();
        dataset.settings.push(copy);

        assert_eq!(
            validate(&dataset),
            vec![ValidationIssue::DuplicateSettings("user1@example.com".to_string())]
        );
    }

    #[test]
    fn test_invalid_email_format() {
        let mut dataset = sample();
        dataset.users[0].email = "not-an-email".to_string();

        let issues = validate(&dataset);
        assert!(issues.iter().any(|issue| matches!(
            issue,
            ValidationIssue::InvalidField { record, .. } if record == "user not-an-email"
        )));
    }

    #[test]
    fn test_google_user_without_subject_id() {
        let mut dataset = sample();
        dataset.users[1].google_sub_id = None;

        assert_eq!(
            validate(&dataset),
            vec![ValidationIssue::SubjectIdMismatch {
                email: "user2@example.com".to_string(),
                provider: "google".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_settings() {
        let mut dataset = sample();
        dataset.settings.pop();

        assert_eq!(
            validate(&dataset),
            vec![ValidationIssue::MissingSettings("user2@example.com".to_string())]
        );
    }

    #[test]
    fn test_settings_out_of_range() {
        let mut dataset = sample();
        dataset.settings[0].daily_task_limit = 0;
        dataset.settings[1].ai_aggressiveness_level = 3;

        let issues = validate(&dataset);
        assert_eq!(issues.len(), 2);
        assert!(issues
            .iter()
            .all(|issue| matches!(issue, ValidationIssue::InvalidField { .. })));
    }

    #[test]
    fn test_second_default_category() {
        let mut dataset = sample();
        dataset.categories.push(SeedCategory {
            user: "user1@example.com".to_string(),
            name: "趣味".to_string(),
            color: "#ABC".to_string(),
            is_default: true,
        });

        assert_eq!(
            validate(&dataset),
            vec![ValidationIssue::MultipleDefaultCategories("user1@example.com".to_string())]
        );
    }

    #[test]
    fn test_bad_color() {
        let mut dataset = sample();
        dataset.categories[0].color = "red".to_string();

        assert!(matches!(
            validate(&dataset).as_slice(),
            [ValidationIssue::InvalidColor { color, .. }] if color == "red"
        ));
    }

    #[test]
    fn test_task_uses_other_users_category() {
        let mut dataset = sample();
        dataset.tasks[2].category = Some(CategoryRef {
            user: "user1@example.com".to_string(),
            name: "仕事".to_string(),
        });

        assert_eq!(
            validate(&dataset),
            vec![ValidationIssue::CategoryOwnerMismatch {
                record: "task 洗濯 of user2@example.com".to_string(),
                name: "仕事".to_string(),
                owner: "user1@example.com".to_string(),
            }]
        );
    }

    #[test]
    fn test_recurring_task_uses_other_users_category() {
        let mut dataset = sample();
        dataset.recurring_tasks[1].category = Some(CategoryRef {
            user: "user1@example.com".to_string(),
            name: "仕事".to_string(),
        });

        assert_eq!(
            validate(&dataset),
            vec![ValidationIssue::CategoryOwnerMismatch {
                record: "recurring task 週末の掃除 of user2@example.com".to_string(),
                name: "仕事".to_string(),
                owner: "user1@example.com".to_string(),
            }]
        );
    }

    #[test]
    fn test_recurring_task_unknown_category() {
        let mut dataset = sample();
        dataset.recurring_tasks[0].category = Some(CategoryRef {
            user: "user1@example.com".to_string(),
            name: "存在しない".to_string(),
        });

        assert!(matches!(
            validate(&dataset).as_slice(),
            [ValidationIssue::UnknownCategory { .. }]
        ));
    }

    #[test]
    fn test_task_out_of_range_fields() {
        let mut dataset = sample();
        dataset.tasks[0].progress = 101;
        dataset.tasks[1].priority_score = 1.5;
        dataset.tasks[2].hurdle_level = Some(4);

        assert_eq!(validate(&dataset).len(), 3);
    }

    #[test]
    fn test_reminder_user_differs_from_task_user() {
        let mut dataset = sample();
        dataset.reminders[0].user = "user2@example.com".to_string();

        assert_eq!(
            validate(&dataset),
            vec![ValidationIssue::ReminderOwnerMismatch {
                user: "user2@example.com".to_string(),
                task: "報告書作成".to_string(),
                task_owner: "user1@example.com".to_string(),
            }]
        );
    }

    #[test]
    fn test_reminder_for_unknown_task() {
        let mut dataset = sample();
        dataset.reminders[1].task.name = "昼寝".to_string();

        assert!(matches!(
            validate(&dataset).as_slice(),
            [ValidationIssue::UnknownTask { name, .. }] if name == "昼寝"
        ));
    }

    #[test]
    fn test_recurrence_end_before_start() {
        let mut dataset = sample();
        dataset.recurring_tasks[0].recurrence_end_date = NaiveDate::from_ymd_opt(2024, 5, 1);

        assert_eq!(validate(&dataset).len(), 1);
    }

    #[test]
    fn test_medication_timing_without_medication() {
        let mut dataset = sample();
        dataset.medication_effects[1].effect_start_time = NaiveTime::from_hms_opt(8, 0, 0);
        dataset.medication_effects[1].effect_duration_minutes = Some(60);

        assert_eq!(
            validate(&dataset),
            vec![ValidationIssue::InconsistentEffectTiming {
                user: "user2@example.com".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            }]
        );
    }

    #[test]
    fn test_duplicate_medication_day() {
        let mut dataset = sample();
        let copy = dataset.medication_effects[0].clone();
        dataset.medication_effects.push(copy);

        assert!(matches!(
            validate(&dataset).as_slice(),
            [ValidationIssue::DuplicateMedicationDate { .. }]
        ));
    }

    #[test]
    fn test_unknown_owner_reported_per_record() {
        let mut dataset = sample();
        dataset.medication_effects[0].user = "ghost@example.com".to_string();

        assert!(validate(&dataset).contains(&ValidationIssue::UnknownUser {
            record: "medication record of ghost@example.com on 2024-06-01".to_string(),
            email: "ghost@example.com".to_string(),
        }));
    }
}
