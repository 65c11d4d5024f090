//! Shared utilities.
//!
//! - [`id_generator`]: random identifiers checked against storage

pub mod id_generator;
