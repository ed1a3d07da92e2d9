//! Authorization extractor for admin endpoints.
//!
//! Admin requests carry HTTP Basic credentials which are verified against
//! the `shop_user` table on every request. There is no session store; the
//! front end holds the credentials and replays them per request.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::ApiError;
use crate::models::User;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Extractor that requires an authenticated sales admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSalesAdmin(admin): RequireSalesAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
pub struct RequireSalesAdmin(pub User);

impl FromRequestParts<AppState> for RequireSalesAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing credentials".to_owned()))?;

        let (username, password) = decode_basic(header)
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".to_owned()))?;

        let user = AuthService::new(state.pool())
            .authenticate(&username, &password)
            .await
            .map_err(|e| match e {
                AuthError::InvalidCredentials => {
                    ApiError::Unauthorized("Invalid credentials".to_owned())
                }
                other => ApiError::from(other),
            })?;

        if !user.is_sales_admin {
            return Err(ApiError::Forbidden("Sales admin access required".to_owned()));
        }

        Ok(Self(user))
    }
}

/// Decode a `Basic <base64(user:pass)>` authorization header value.
fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_owned(), password.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_well_formed_headers() {
        // "sales:s3cret"
        let header = format!("Basic {}", BASE64.encode("sales:s3cret"));
        assert_eq!(
            decode_basic(&header),
            Some(("sales".to_owned(), "s3cret".to_owned()))
        );
    }

    #[test]
    fn passwords_may_contain_colons() {
        let header = format!("Basic {}", BASE64.encode("sales:a:b:c"));
        assert_eq!(
            decode_basic(&header),
            Some(("sales".to_owned(), "a:b:c".to_owned()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_bad_encodings() {
        assert_eq!(decode_basic("Bearer token"), None);
        assert_eq!(decode_basic("Basic !!!not-base64!!!"), None);
        let no_colon = format!("Basic {}", BASE64.encode("just-a-user"));
        assert_eq!(decode_basic(&no_colon), None);
    }
}
