/// Database layer for FocusTask
///
/// This module provides SQLite connection pooling and the embedded schema
/// migrations.
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `migrations`: Schema migration runner and table checks
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use focustask_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: "sqlite://task_manager.db".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
