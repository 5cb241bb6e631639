//! # FocusTask Seed
//!
//! Fills a FocusTask SQLite database with sample data.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=sqlite://task_manager.db cargo run -p focustask-seed
//! ```

use focustask_seed::config::{Config, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "focustask_seed=info,focustask_shared=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    tracing::info!("FocusTask Seed v{} starting...", env!("CARGO_PKG_VERSION"));

    focustask_seed::run(&config).await?;

    println!("{}", focustask_seed::COMPLETION_MESSAGE);
    Ok(())
}
