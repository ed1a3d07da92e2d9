//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use driftwood_core::UserId;

use super::RepositoryError;
use crate::models::User;

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    password_hash: String,
    is_sales_admin: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user_and_hash(self) -> (User, String) {
        (
            User {
                id: UserId::new(self.id),
                username: self.username,
                is_sales_admin: self.is_sales_admin,
                created_at: self.created_at,
            },
            self.password_hash,
        )
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        is_sales_admin: bool,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO shop_user (username, password_hash, is_sales_admin) \
             VALUES ($1, $2, $3) \
             RETURNING id, username, password_hash, is_sales_admin, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .bind(is_sales_admin)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("Username already taken".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into_user_and_hash().0)
    }

    /// Get a user and their stored password hash by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, password_hash, is_sales_admin, created_at \
             FROM shop_user WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(UserRow::into_user_and_hash))
    }
}
