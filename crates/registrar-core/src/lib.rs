//! # Registrar Core
//!
//! Core types, errors, and utilities for the registrar API.
//!
//! - [`errors`]: Application error taxonomy with HTTP response conversion
//! - [`repository`]: Storage-agnostic repository errors
//! - [`pagination`]: Pagination and sort allow-list utilities
//! - [`password`]: Password hashing and verification
//! - [`validation`]: Identifier and field format validators
//! - [`serde`]: Query-string deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use registrar_core::{AppError, validation};
//!
//! let id = validation::faculty_id(" FAK00001 ")?;
//! assert_eq!(id, "FAK00001");
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod repository;
pub mod serde;
pub mod validation;

pub use errors::{AppError, AppResult};
pub use pagination::{
    OrderBy, PageRequest, PaginationMeta, PaginationParams, SortDirection, SortParams,
};
pub use password::{hash_password, verify_missing_account, verify_password};
pub use repository::{RepoResult, RepositoryError};
