pub use registrar_models::users::*;

/// Result of a successful login. `user.password_hash` is always empty.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.token,
            expires_in: outcome.expires_in,
            user: LoginUser {
                id_user: outcome.user.id_user,
                username: outcome.user.username,
                role: outcome.user.role,
                ref_id: outcome.user.ref_id,
            },
        }
    }
}
