//! Classification of sqlx errors into [`RepositoryError`].

use registrar_core::{RepoResult, RepositoryError};

pub fn classify(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or_default().to_string();
        if db_err.is_unique_violation() {
            return RepositoryError::UniqueViolation(constraint);
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::ForeignKeyViolation(constraint);
        }
    }
    RepositoryError::Storage(err.into())
}

/// `.repo()` converts a sqlx result into a [`RepoResult`].
pub trait SqlxResultExt<T> {
    fn repo(self) -> RepoResult<T>;
}

impl<T> SqlxResultExt<T> for Result<T, sqlx::Error> {
    fn repo(self) -> RepoResult<T> {
        self.map_err(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_storage() {
        let err = classify(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Storage(_)));
    }

    #[test]
    fn test_result_ext_passes_ok_through() {
        let ok: Result<i32, sqlx::Error> = Ok(7);
        assert_eq!(ok.repo().unwrap(), 7);
    }
}
