/// Configuration for the seed binary
///
/// Values come from environment variables, with a `.env` file in the working
/// directory loaded first when present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: SQLite database URL (default: sqlite://task_manager.db)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `SEED_CREATE_DATABASE`: Create the database file when missing (default: true)
/// - `SEED_APPLY_MIGRATIONS`: Apply the embedded schema before seeding (default: true)
/// - `SEED_DATASET_PATH`: JSON dataset to load instead of the built-in sample
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `RUST_LOG`: Log filter (default: focustask_seed=info,focustask_shared=info)
///
/// # Example
///
/// ```no_run
/// use focustask_seed::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Seeding {}", config.database.url);
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://task_manager.db";

/// Complete seed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Seeding behavior
    pub seed: SeedConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Create the database file if it doesn't exist
    pub create_database: bool,

    /// Apply embedded migrations before loading data
    pub apply_migrations: bool,

    /// Dataset file; the built-in sample is used when unset
    pub dataset_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable if a value cannot be parsed
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        let create_database =
            parse_flag("SEED_CREATE_DATABASE", lookup("SEED_CREATE_DATABASE"), true)?;
        let apply_migrations =
            parse_flag("SEED_APPLY_MIGRATIONS", lookup("SEED_APPLY_MIGRATIONS"), true)?;

        let dataset_path = lookup("SEED_DATASET_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let log_format = lookup("LOG_FORMAT").map(|value| value.trim().to_ascii_lowercase());
        let log_format = match log_format.as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        };

        Ok(Self {
            database: DatabaseConfig {
                url,
                max_connections,
            },
            seed: SeedConfig {
                create_database,
                apply_migrations,
                dataset_path,
            },
            log_format,
        })
    }
}

fn parse_flag(name: &str, value: Option<String>, default: bool) -> anyhow::Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{} must be a boolean, got '{}'", name, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.seed.create_database);
        assert!(config.seed.apply_migrations);
        assert!(config.seed.dataset_path.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite:///tmp/seed.db"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
            ("SEED_CREATE_DATABASE", "no"),
            ("SEED_APPLY_MIGRATIONS", "0"),
            ("SEED_DATASET_PATH", "data/seed.json"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.database.url, "sqlite:///tmp/seed.db");
        assert_eq!(config.database.max_connections, 2);
        assert!(!config.seed.create_database);
        assert!(!config.seed.apply_migrations);
        assert_eq!(config.seed.dataset_path, Some(PathBuf::from("data/seed.json")));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = config_from(&[("DATABASE_MAX_CONNECTIONS", "many")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));

        let err = config_from(&[("SEED_APPLY_MIGRATIONS", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("SEED_APPLY_MIGRATIONS"));

        let err = config_from(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(err.to_string().contains("LOG_FORMAT"));
    }

    #[test]
    fn test_empty_dataset_path_is_ignored() {
        let config = config_from(&[("SEED_DATASET_PATH", "  ")]).unwrap();
        assert!(config.seed.dataset_path.is_none());
    }
}
