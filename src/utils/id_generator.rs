//! Random identifiers for entities whose id the caller may omit.
//!
//! Candidates come from the operating system RNG and are checked against
//! storage before use. After [`MAX_ATTEMPTS`] collisions generation gives up
//! with `Conflict`.

use std::future::Future;

use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};
use registrar_core::{AppError, AppResult, RepoResult};

pub const MAX_ATTEMPTS: usize = 10;

/// `prefix` followed by five random digits, e.g. `FAK04217`.
pub fn numbered(prefix: &str) -> String {
    let n: u32 = OsRng.gen_range(0..100_000);
    format!("{prefix}{n:05}")
}

/// `len` characters drawn from `A-Z`, `a-z` and `0-9`.
pub fn alphanumeric(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Draws candidates from `generate` until `exists` reports a free one.
pub async fn generate_unique<G, E, Fut>(mut generate: G, exists: E) -> AppResult<String>
where
    G: FnMut() -> String,
    E: Fn(String) -> Fut,
    Fut: Future<Output = RepoResult<bool>>,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let candidate = generate();
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
        tracing::debug!(attempt, candidate = %candidate, "generated id already taken");
    }
    tracing::warn!(attempts = MAX_ATTEMPTS, "id generation exhausted");
    Err(AppError::conflict("could not generate a unique id"))
}
