use registrar_core::OrderBy;

pub use registrar_models::students::*;

/// Columns accepted by `sort_by`.
pub const SORT_COLUMNS: &[&str] = &["nama_lengkap", "tahun_masuk", "created_at", "updated_at"];

pub const DEFAULT_ORDER: OrderBy = OrderBy::asc("nama_lengkap");
