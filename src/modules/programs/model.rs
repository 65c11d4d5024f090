use registrar_core::OrderBy;

pub use registrar_models::programs::*;

/// Columns accepted by `sort_by`.
pub const SORT_COLUMNS: &[&str] = &[
    "nama_prodi",
    "kode_prodi",
    "jenjang",
    "akreditasi",
    "created_at",
    "updated_at",
];

pub const DEFAULT_ORDER: OrderBy = OrderBy::asc("nama_prodi");
