/// User model and database operations
///
/// This module provides the User model and the operations the seed loader and
/// its tests need for user accounts. A user signs in either with a local
/// email/password pair or through an external identity provider.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT,
///     name TEXT,
///     auth_provider TEXT NOT NULL,      -- 'email' | 'google' | 'apple'
///     google_sub_id TEXT,
///     apple_sub_id TEXT,
///     created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     last_login_at TEXT
/// );
/// ```
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
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: Some("hashed_password".to_string()),
///     name: Some("Jane Doe".to_string()),
///     auth_provider: AuthProvider::Email,
///     google_sub_id: None,
///     apple_sub_id: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// println!("Created user: {}", user.id);
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// # Ok(())
/// # }
/// ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

/// How a user authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Local email and password
    Email,

    /// Google account
    Google,

    /// Apple ID
    Apple,
}

impl AuthProvider {
    /// Converts provider to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Email => "email",
            AuthProvider::Google => "google",
            AuthProvider::Apple => "apple",
        }
    }

    /// Whether the provider is an external identity provider
    ///
    /// External providers identify users by a subject id instead of a password.
    pub fn is_external(&self) -> bool {
        !matches!(self, AuthProvider::Email)
    }
}

/// User model representing a user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Email address
    ///
    /// Must be unique across all users
    pub email: String,

    /// Password hash
    ///
    /// Optional for accounts created through an external provider
    pub password_hash: Option<String>,

    /// Optional display name
    pub name: Option<String>,

    /// Authentication provider
    pub auth_provider: AuthProvider,

    /// Google subject id (set iff `auth_provider` is Google)
    pub google_sub_id: Option<String>,

    /// Apple subject id (set iff `auth_provider` is Apple)
    pub apple_sub_id: Option<String>,

    /// When the user account was created
    pub created_at: NaiveDateTime,

    /// When the user last logged in (None if never logged in)
    pub last_login_at: Option<NaiveDateTime>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Password hash (NOT plaintext password!)
    pub password_hash: Option<String>,

    /// Optional display name
    pub name: Option<String>,

    /// Authentication provider
    pub auth_provider: AuthProvider,

    /// Google subject id
    pub google_sub_id: Option<String>,

    /// Apple subject id
    pub apple_sub_id: Option<String>,
}

impl User {
    /// Returns the subject id issued by the user's external provider
    ///
    /// Local email accounts have no external subject and return `None`.
    pub fn external_subject_id(&self) -> Option<&str> {
        match self.auth_provider {
            AuthProvider::Email => None,
            AuthProvider::Google => self.google_sub_id.as_deref(),
            AuthProvider::Apple => self.apple_sub_id.as_deref(),
        }
    }

    /// Creates a new user in the database
    ///
    /// Accepts the pool or an open transaction.
    ///
    /// # Arguments
    ///
    /// * `executor` - Pool or connection to run the insert on
    /// * `data` - User creation data
    ///
    /// # Returns
    ///
    /// The newly created user with generated ID and creation timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists (unique constraint violation)
    /// - The provider/subject id combination violates the table CHECK
    /// - Database connection fails
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, auth_provider,
                               google_sub_id, apple_sub_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, email, password_hash, name, auth_provider, google_sub_id,
                      apple_sub_id, created_at, last_login_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.auth_provider)
        .bind(data.google_sub_id)
        .bind(data.apple_sub_id)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, auth_provider, google_sub_id,
                   apple_sub_id, created_at, last_login_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, auth_provider, google_sub_id,
                   apple_sub_id, created_at, last_login_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists users with pagination, oldest first
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `limit` - Maximum number of users to return
    /// * `offset` - Number of users to skip (for pagination)
    pub async fn list(
        pool: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, auth_provider, google_sub_id,
                   apple_sub_id, created_at, last_login_at
            FROM users
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts total number of users
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(provider: AuthProvider, google: Option<&str>, apple: Option<&str>) -> User {
        User {
            id: 1,
            email: "test@example.com".to_string(),
            password_hash: None,
            name: None,
            auth_provider: provider,
            google_sub_id: google.map(str::to_string),
            apple_sub_id: apple.map(str::to_string),
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_auth_provider_as_str() {
        assert_eq!(AuthProvider::Email.as_str(), "email");
        assert_eq!(AuthProvider::Google.as_str(), "google");
        assert_eq!(AuthProvider::Apple.as_str(), "apple");
    }

    #[test]
    fn test_auth_provider_is_external() {
        assert!(!AuthProvider::Email.is_external());
        assert!(AuthProvider::Google.is_external());
        assert!(AuthProvider::Apple.is_external());
    }

    #[test]
    fn test_external_subject_id_follows_provider() {
        assert_eq!(user(AuthProvider::Email, None, None).external_subject_id(), None);
        assert_eq!(
            user(AuthProvider::Google, Some("google_sub_123"), None).external_subject_id(),
            Some("google_sub_123")
        );
        assert_eq!(
            user(AuthProvider::Apple, None, Some("apple_sub_9")).external_subject_id(),
            Some("apple_sub_9")
        );
    }

    #[test]
    fn test_auth_provider_serde_lowercase() {
        let json = serde_json::to_string(&AuthProvider::Google).unwrap();
        assert_eq!(json, "\"google\"");
    }
}
