//! Administrative commands shared by the `registrar-cli` binary.
//!
//! Both commands go through the same services as the HTTP API, so every
//! validation rule applies.

use std::path::Path;

use anyhow::Context;
use registrar_config::PasswordConfig;
use registrar_core::AppResult;
use registrar_models::UserRole;
use registrar_models::users::{RegisterRequest, User};

use crate::modules::auth::repository::UserRepository;
use crate::modules::auth::service::AuthService;
use crate::modules::terms::import::{self, ImportReport};
use crate::modules::terms::repository::TermRepository;

/// Registers an `admin` credential.
pub async fn create_admin(
    repo: &dyn UserRepository,
    password_config: &PasswordConfig,
    username: &str,
    password: &str,
) -> AppResult<User> {
    AuthService::register(
        repo,
        password_config,
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role: UserRole::Admin.as_str().to_string(),
            ref_id: None,
        },
    )
    .await
}

/// Runs the Semester CSV importer over a file on disk.
pub async fn import_terms_file(
    repo: &dyn TermRepository,
    path: &Path,
    commit: bool,
) -> anyhow::Result<ImportReport> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    let report = import::import_terms(repo, &data, !commit).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;
    use registrar_core::AppError;

    #[tokio::test]
    async fn test_create_admin_registers_admin_role() {
        let store = InMemoryStore::new();
        let config = PasswordConfig { bcrypt_cost: 4 };

        let user = create_admin(&store, &config, "root", "rahasia123").await.unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.ref_id, None);

        let again = create_admin(&store, &config, "root", "rahasia123").await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_import_missing_file_is_error() {
        let store = InMemoryStore::new();
        let result = import_terms_file(&store, Path::new("/nonexistent/terms.csv"), false).await;
        assert!(result.unwrap_err().to_string().contains("cannot read"));
    }
}
