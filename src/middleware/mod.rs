//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: Bearer token extractor
//! - [`role`]: Role guards, as route middleware and as extractors
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` extractor verifies the HS256 token and extracts claims
//! 3. A role guard compares the claimed role against the route's allow-list
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::role::{RequireAnyRole, RequireStaff};
//!
//! // Any authenticated role
//! async fn list_terms(RequireAnyRole(_): RequireAnyRole) -> impl IntoResponse { /* ... */ }
//!
//! // admin or operator only
//! async fn create_term(RequireStaff(user): RequireStaff) -> impl IntoResponse { /* ... */ }
//! ```

pub mod auth;
pub mod role;
