use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    /// One of `admin`, `operator`, `dosen`, `mahasiswa`
    pub role: String,
    /// Student or lecturer id the account belongs to
    pub ref_id: Option<String>,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}
