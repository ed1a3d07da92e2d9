//! API user models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use driftwood_core::UserId;

/// An API user. Only sales admins exist today; the flag is kept explicit
/// rather than implied so regular customer accounts can be added later.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub is_sales_admin: bool,
    pub created_at: DateTime<Utc>,
}
