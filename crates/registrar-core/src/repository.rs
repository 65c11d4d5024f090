//! Storage-agnostic repository errors.
//!
//! Repository traits return [`RepoResult`]. Absence is modelled with
//! `Option`/`bool` in the trait signatures, so the only failures left are
//! constraint violations reported by the store and opaque storage errors.

use thiserror::Error;

use crate::errors::AppError;

pub type RepoResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write. Carries the constraint name
    /// when the store reports one.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    /// A foreign key constraint rejected the write or delete.
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl RepositoryError {
    /// Maps a failed insert or update. A unique violation becomes the same
    /// conflict the service pre-check reports; a foreign key violation means
    /// a referenced record vanished and becomes `Unprocessable`.
    pub fn into_write_error(self, conflict_message: &str) -> AppError {
        match self {
            Self::UniqueViolation(_) => AppError::conflict(conflict_message),
            Self::ForeignKeyViolation(_) => {
                AppError::unprocessable("referenced record does not exist")
            }
            Self::Storage(err) => AppError::Internal(err),
        }
    }

    /// Maps a failed delete. A foreign key violation means a dependent row
    /// appeared after the relation checks ran.
    pub fn into_delete_error(self, conflict_message: &str) -> AppError {
        match self {
            Self::ForeignKeyViolation(_) | Self::UniqueViolation(_) => {
                AppError::conflict(conflict_message)
            }
            Self::Storage(err) => AppError::Internal(err),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(_) => AppError::conflict("resource already exists"),
            RepositoryError::ForeignKeyViolation(_) => {
                AppError::conflict("resource is referenced by other records")
            }
            RepositoryError::Storage(err) => AppError::Internal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_unique_is_conflict() {
        let err = RepositoryError::UniqueViolation("users_username_key".into())
            .into_write_error("username already taken");
        assert!(matches!(err, AppError::Conflict(ref m) if m == "username already taken"));
    }

    #[test]
    fn test_write_error_foreign_key_is_unprocessable() {
        let err = RepositoryError::ForeignKeyViolation("prodi_id_fakultas_fkey".into())
            .into_write_error("duplicate");
        assert!(matches!(err, AppError::Unprocessable(_)));
    }

    #[test]
    fn test_delete_error_foreign_key_is_conflict() {
        let err = RepositoryError::ForeignKeyViolation("krs_id_mahasiswa_fkey".into())
            .into_delete_error("student has course registrations");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_storage_error_is_internal() {
        let err: AppError = RepositoryError::Storage(anyhow::anyhow!("connection reset")).into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
