//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! dw-cli migrate
//! ```
//!
//! Migration files live in `crates/api/migrations/` and are embedded into
//! the binary at compile time.

use super::CliError;

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
