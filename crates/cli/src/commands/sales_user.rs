//! Sales-admin provisioning command.
//!
//! # Usage
//!
//! ```bash
//! dw-cli sales-user create -u mara -p 'a long password'
//! ```
//!
//! Uses the same argon2 hashing as the API's provisioning endpoint, so the
//! bootstrap admin is indistinguishable from one created over HTTP.

use driftwood_api::services::auth::AuthService;

use super::CliError;

/// Create a sales admin.
///
/// # Errors
///
/// Returns `CliError::Auth` if the username is taken or a field is empty.
pub async fn create(username: &str, password: &str) -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Creating sales admin: {username}");
    let user = AuthService::new(&pool)
        .create_sales_user(username, password)
        .await?;

    tracing::info!(
        "Sales admin created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );
    Ok(())
}
