//! # Registrar Models
//!
//! Domain models and DTOs for the registrar API.
//!
//! Field names match the wire format and the database columns, so rows map
//! with `sqlx::FromRow` and bodies with serde without renames.
//!
//! Per resource the module holds:
//!
//! - the entity as stored and returned
//! - `Create*Dto` / `Replace*Dto` / `Patch*Dto`: raw request bodies, still
//!   holding strings so services can report `InvalidInput`
//! - `*Fields` / `*Patch`: validated column values handed to repositories
//! - `*Filter`: validated list filters, `*ListParams`: raw list query
//!
//! # Modules
//!
//! - [`enums`]: text-backed enumerations
//! - [`common`]: response envelopes
//! - [`faculties`], [`programs`], [`lecturers`], [`students`], [`terms`]
//! - [`users`]: credentials and auth DTOs

pub mod common;
pub mod enums;
pub mod faculties;
pub mod lecturers;
pub mod programs;
pub mod students;
pub mod terms;
pub mod users;

pub use common::{DataResponse, ListResponse, MessageResponse};
pub use enums::{Accreditation, DegreeLevel, Sex, StudentStatus, TermName, UserRole};
