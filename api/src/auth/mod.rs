// Session handling against the hosted auth provider
// Every /api route is gated: the extractor resolves the caller's session
// before the handler body runs.

mod session_client;

pub use session_client::{AuthUser, SessionClient};

use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::error::StoreError;
use crate::handlers::AppState;

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
/// Handlers that take this parameter reject unauthenticated requests with
/// 401 before running.
#[derive(Debug, Clone)]
pub struct AuthSession(pub AuthUser);

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = StoreError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| StoreError::Unauthorized("Missing Authorization header".to_string()))?;

        let header_str = header_value
            .to_str()
            .map_err(|_| StoreError::Unauthorized("Invalid Authorization header".to_string()))?;

        let token = header_str.strip_prefix("Bearer ").ok_or_else(|| {
            StoreError::Unauthorized(
                "Invalid Authorization format (expected: Bearer <token>)".to_string(),
            )
        })?;

        let user = state.sessions.get_user(token).await?;

        Ok(AuthSession(user))
    }
}
