//! CLI subcommand implementations.

pub mod migrate;
pub mod sales_user;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by all CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Provisioning error from the API's auth service.
    #[error("Auth error: {0}")]
    Auth(#[from] driftwood_api::services::auth::AuthError),

    /// Repository error from the API's data layer.
    #[error("Repository error: {0}")]
    Repository(#[from] driftwood_api::db::RepositoryError),
}

/// Connect to the database named by `DATABASE_URL`.
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| CliError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = driftwood_api::db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}
