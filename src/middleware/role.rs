//! Role-based authorization for Axum.
//!
//! Two forms of the same check:
//! 1. Layer-based middleware (`require_staff`) for routers where every
//!    route shares one allow-list
//! 2. Extractors generated by `require_roles!` for routers that mix
//!    allow-lists per handler

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use registrar_core::AppError;
use registrar_models::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Roles allowed to manage master data.
pub const STAFF_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Operator];

/// Every role that can hold a token.
pub const ALL_ROLES: &[UserRole] = &[
    UserRole::Admin,
    UserRole::Operator,
    UserRole::Lecturer,
    UserRole::Student,
];

/// Verifies the token and fails with `Forbidden` unless the claimed role is
/// in `allowed`.
pub fn authorize(auth_user: &AuthUser, allowed: &[UserRole]) -> Result<UserRole, AppError> {
    let role = auth_user.role()?;
    if !allowed.contains(&role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Role {role} is not allowed"
        )));
    }
    Ok(role)
}

/// Middleware that checks the authenticated user holds one of `allowed_roles`.
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/", get(handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    authorize(&auth_user, allowed_roles)?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}

/// admin or operator.
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, STAFF_ROLES).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Declares an extractor that admits only the listed roles.
#[macro_export]
macro_rules! require_roles {
    ($name:ident, $roles:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = registrar_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;
                $crate::middleware::role::authorize(&auth_user, $roles)?;
                Ok($name(auth_user))
            }
        }
    };
}

require_roles!(RequireStaff, STAFF_ROLES);
require_roles!(RequireAnyRole, ALL_ROLES);
