use registrar_core::OrderBy;

pub use registrar_models::terms::*;

/// Columns accepted by `sort_by`.
pub const SORT_COLUMNS: &[&str] = &[
    "id_semester",
    "tahun_ajaran",
    "term",
    "tanggal_mulai",
    "tanggal_selesai",
    "created_at",
    "updated_at",
];

pub const DEFAULT_ORDER: OrderBy = OrderBy::desc("id_semester");
