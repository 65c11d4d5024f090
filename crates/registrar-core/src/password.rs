//! Password hashing primitives.
//!
//! Thin wrappers around `bcrypt`. The cost factor is a deployment parameter
//! supplied by the caller (see `registrar_config::PasswordConfig`).

use once_cell::sync::Lazy;

use crate::errors::AppError;

/// Hash checked when no account matches, at the default deployment cost.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| bcrypt::hash("registrar-missing-account", bcrypt::DEFAULT_COST).ok());

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to hash password: {e}")))
}

/// Returns `false` for a mismatch and for a malformed stored hash, so
/// callers cannot tell the two apart.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Spends one verification on a throwaway hash so an unknown username costs
/// as much as a wrong password. Always `false`.
pub fn verify_missing_account(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("rahasia123", TEST_COST).unwrap();
        assert_ne!(hash, "rahasia123");
        assert!(verify_password("rahasia123", &hash));
        assert!(!verify_password("rahasia124", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("rahasia123", TEST_COST).unwrap();
        let b = hash_password("rahasia123", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        assert!(!verify_password("rahasia123", "not-a-bcrypt-hash"));
        assert!(!verify_password("rahasia123", ""));
    }

    #[test]
    fn test_missing_account_pays_full_cost() {
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(hash.contains(&format!("${:02}$", bcrypt::DEFAULT_COST)));
        assert!(!verify_missing_account("registrar-missing-account"));
        assert!(!verify_missing_account("rahasia123"));
    }

    #[test]
    fn test_invalid_cost_is_internal_error() {
        let err = hash_password("rahasia123", 99).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
