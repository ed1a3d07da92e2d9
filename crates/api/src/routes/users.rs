//! Sales-user provisioning route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireSalesAdmin;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Request body for provisioning a sales admin.
#[derive(Debug, Deserialize)]
pub struct CreateSalesUserRequest {
    pub username: String,
    pub password: String,
}

/// Create a user with sales-admin permissions.
///
/// The first sales admin is provisioned via `dw-cli sales-user create`;
/// this endpoint lets existing admins add more.
#[instrument(skip(_admin, state, request))]
pub async fn create_sales_user(
    RequireSalesAdmin(_admin): RequireSalesAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateSalesUserRequest>,
) -> Result<impl IntoResponse> {
    let user = AuthService::new(state.pool())
        .create_sales_user(&request.username, &request.password)
        .await?;

    tracing::info!(username = %user.username, "sales admin created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "username": user.username,
            "status": "Sales admin created",
        })),
    ))
}
