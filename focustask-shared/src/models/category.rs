/// Task categories
///
/// Categories belong to a single user. At most one category per user carries
/// the default flag; the schema backs this with a partial unique index.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE categories (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     name TEXT NOT NULL,
///     color TEXT NOT NULL,              -- '#RRGGBB' or '#RGB'
///     is_default INTEGER NOT NULL DEFAULT 0,
///     UNIQUE (user_id, name)
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,

    /// Display color as a hex string
    pub color: String,

    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategory {
    pub user_id: i64,
    pub name: String,
    pub color: String,
    pub is_default: bool,
}

/// Returns true for `#RGB` and `#RRGGBB` color strings
pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

impl Category {
    pub async fn create<'e, E>(executor: E, data: CreateCategory) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (user_id, name, color, is_default)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, name, color, is_default
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.color)
        .bind(data.is_default)
        .fetch_one(executor)
        .await?;

        Ok(category)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, user_id, name, color, is_default FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Lists a user's categories in insertion order
    pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, color, is_default
            FROM categories
            WHERE user_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Finds the category flagged as default for a user, if any
    pub async fn find_default_for_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, color, is_default
            FROM categories
            WHERE user_id = ? AND is_default = 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#FF0000"));
        assert!(is_hex_color("#0f0"));
        assert!(is_hex_color("#4ECDC4"));
        assert!(!is_hex_color("FF0000"));
        assert!(!is_hex_color("#FF00"));
        assert!(!is_hex_color("#GG0000"));
        assert!(!is_hex_color(""));
    }
}
