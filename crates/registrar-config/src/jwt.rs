use std::env;

/// Used when `JWT_SECRET` is unset. Tokens signed with it are only fit for
/// local development.
pub const DEV_SECRET: &str = "registrar-dev-secret-change-me";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn from_env() -> Self {
        match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => Self::new(secret),
            _ => {
                tracing::warn!("JWT_SECRET is not set, using the development secret");
                Self::new(DEV_SECRET)
            }
        }
    }
}
