//! Token issuance and verification.
//!
//! Tokens are signed with HMAC-SHA256 using `JwtConfig::secret`. A token
//! whose header names any other algorithm is rejected.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use registrar_config::JwtConfig;
use registrar_core::AppError;

use crate::claims::Claims;

/// Validity window of an access token: 24 hours.
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Signs a token for the given user, valid from now for [`TOKEN_TTL_SECONDS`].
pub fn create_access_token(
    user_id: i64,
    username: &str,
    role: &str,
    ref_id: Option<&str>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    create_access_token_at(
        user_id,
        username,
        role,
        ref_id,
        Utc::now().timestamp(),
        jwt_config,
    )
}

/// Same as [`create_access_token`] with an explicit issued-at timestamp.
pub fn create_access_token_at(
    user_id: i64,
    username: &str,
    role: &str,
    ref_id: Option<&str>,
    issued_at: i64,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let claims = Claims {
        user_id,
        username: username.to_string(),
        role: role.to_string(),
        ref_id: ref_id.map(str::to_string),
        iat: issued_at,
        exp: issued_at + TOKEN_TTL_SECONDS,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("failed to sign token: {e}")))
}

/// Verifies signature, algorithm and expiry, returning the claims.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        AppError::unauthorized("invalid or expired token")
    })
}
