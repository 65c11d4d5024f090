use axum::{Json, extract::State, http::StatusCode};
use registrar_core::AppError;
use tracing::instrument;

use crate::state::AppState;
use crate::validator::AppJson;

use super::model::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use super::service::AuthService;

/// Register a credential
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid input or unknown ref_id"),
        (status = 409, description = "Username already taken")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user = AuthService::register(state.users.as_ref(), &state.password_config, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "created".to_string(),
            user: user.into(),
        }),
    ))
}

/// Log in and receive a 24 hour bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid username or password")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let outcome = AuthService::login(state.users.as_ref(), &state.jwt_config, request).await?;
    Ok(Json(outcome.into()))
}
