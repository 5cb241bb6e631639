//! # FocusTask Seed
//!
//! Populates a FocusTask database with sample data: two users with their
//! settings, categories, tasks, recurring tasks, reminders and medication
//! effect records.
//!
//! The binary in `main.rs` reads [`config::Config`] from the environment and
//! hands it to [`run`].

pub mod config;

use anyhow::Context;
use config::Config;
use focustask_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{close_pool, create_pool, DatabaseConfig},
};
use focustask_shared::seed::{self, integrity, SeedDataset, SeedReport};
use tracing::{info, warn};

/// Message printed once seeding has finished
pub const COMPLETION_MESSAGE: &str = "Sample data inserted successfully.";

/// Seeds the configured database
///
/// Creates the database file and applies migrations when configured to,
/// loads the dataset, then reports any integrity violations found in the
/// committed data as warnings. The pool is closed before returning.
pub async fn run(config: &Config) -> anyhow::Result<SeedReport> {
    if config.seed.create_database {
        ensure_database_exists(&config.database.url)
            .await
            .with_context(|| format!("Failed to create database {}", config.database.url))?;
    }

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await
    .with_context(|| format!("Failed to connect to {}", config.database.url))?;

    let result = seed_pool(&pool, config).await;
    close_pool(pool).await;
    result
}

async fn seed_pool(pool: &sqlx::SqlitePool, config: &Config) -> anyhow::Result<SeedReport> {
    if config.seed.apply_migrations {
        run_migrations(pool).await.context("Failed to apply migrations")?;
    }

    let dataset = match &config.seed.dataset_path {
        Some(path) => {
            info!(path = %path.display(), "Loading dataset file");
            SeedDataset::from_json_file(path)
                .await
                .with_context(|| format!("Failed to load dataset {}", path.display()))?
        }
        None => SeedDataset::sample().context("Built-in sample dataset is malformed")?,
    };

    let report = seed::load(pool, &dataset).await.context("Failed to seed database")?;

    let violations = integrity::check(pool).await.context("Integrity check failed")?;
    for violation in &violations {
        warn!(%violation, "Integrity violation in seeded data");
    }

    info!(
        users = report.users,
        user_settings = report.user_settings,
        categories = report.categories,
        tasks = report.tasks,
        recurring_tasks = report.recurring_tasks,
        reminders = report.reminders,
        medication_effects = report.medication_effects,
        "Seeding finished"
    );

    Ok(report)
}
