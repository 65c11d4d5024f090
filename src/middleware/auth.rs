use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use registrar_auth::{Claims, verify_token};
use registrar_core::AppError;
use registrar_models::UserRole;

use crate::state::AppState;

/// Extractor that verifies the bearer token and provides its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The claimed role. A token carrying an unknown role is rejected as
    /// forbidden rather than unauthenticated: the signature was valid.
    pub fn role(&self) -> Result<UserRole, AppError> {
        self.0
            .role
            .parse::<UserRole>()
            .map_err(|_| AppError::forbidden("Access denied. Unknown role"))
    }

    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }

    pub fn ref_id(&self) -> Option<&str> {
        self.0.ref_id.as_deref()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}
