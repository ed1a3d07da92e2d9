//! Authentication and sales-user provisioning.
//!
//! Passwords are hashed with argon2 before storage; the stored value is the
//! PHC string, never the plaintext. Authentication is stateless: admin
//! requests carry HTTP Basic credentials which are verified per request
//! (see `middleware::auth`).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username already exists.
    #[error("username already taken")]
    UsernameTaken,

    /// A required field was missing or empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Authentication service.
///
/// Handles sales-user provisioning and credential verification.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Create a user with the sales-admin flag set.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if username or password is empty.
    /// Returns `AuthError::UsernameTaken` if the username is already used.
    pub async fn create_sales_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(username, &password_hash, true)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Verify a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the pair is wrong. Unknown
    /// usernames and wrong passwords are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_with_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_never_equals_plaintext() {
        let hash = hash_password("hunter2-but-longer").unwrap();
        assert_ne!(hash, "hunter2-but-longer");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn verify_accepts_the_original_password() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
    }

    #[test]
    fn verify_rejects_a_wrong_password() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(matches!(
            verify_password("incorrect horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn verify_rejects_garbage_hashes() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
