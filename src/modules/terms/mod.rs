//! Academic terms (semester).
//!
//! Reads are open to every authenticated role; writes and the CSV import
//! are restricted to staff.

pub mod controller;
pub mod import;
pub mod model;
pub mod repository;
pub mod router;
pub mod service;
