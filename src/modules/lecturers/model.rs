use registrar_core::OrderBy;

pub use registrar_models::lecturers::*;

/// Columns accepted by `sort_by`.
pub const SORT_COLUMNS: &[&str] = &["nama_dosen", "nidn", "email", "created_at", "updated_at"];

pub const DEFAULT_ORDER: OrderBy = OrderBy::asc("nama_dosen");
