/// Database models for FocusTask
///
/// This module contains the seven seeded tables and their database
/// operations. `create` functions accept any SQLite executor so the seed
/// loader can run them inside a single transaction.
///
/// # Models
///
/// - `user`: User accounts and authentication provider
/// - `settings`: One settings row per user
/// - `category`: Per-user task categories
/// - `task`: Tasks
/// - `recurring_task`: Recurring task templates and their rule encoding
/// - `reminder`: Reminders attached to tasks
/// - `medication_effect`: Per-day medication effect records
///
/// # Example
///
/// ```no_run
/// use focustask_shared::models::user::{AuthProvider, CreateUser, User};
/// use focustask_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let mut tx = pool.begin().await?;
/// let user = User::create(&mut *tx, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: None,
///     name: Some("Jane Doe".to_string()),
///     auth_provider: AuthProvider::Google,
///     google_sub_id: Some("google_sub_1".to_string()),
///     apple_sub_id: None,
/// }).await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

pub mod category;
pub mod medication_effect;
pub mod recurring_task;
pub mod reminder;
pub mod settings;
pub mod task;
pub mod user;
