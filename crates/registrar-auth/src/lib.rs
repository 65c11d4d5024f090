//! # Registrar Auth
//!
//! JWT claims and HS256 token utilities for the registrar API.
//!
//! - [`claims`]: the claim set carried by access tokens
//! - [`jwt`]: token issuance and verification
//!
//! Tokens are valid for [`TOKEN_TTL_SECONDS`] (24 hours). Verification only
//! accepts HS256 signatures.
//!
//! # Example
//!
//! ```ignore
//! use registrar_auth::{create_access_token, verify_token};
//! use registrar_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(1, "admin", "admin", None, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.username, "admin");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{TOKEN_TTL_SECONDS, create_access_token, create_access_token_at, verify_token};
