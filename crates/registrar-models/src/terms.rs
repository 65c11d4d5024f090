//! Academic term (semester) models and DTOs.
//!
//! A term id is a 4-digit year followed by the term digit: `1` Ganjil,
//! `2` Genap, `3` Antara. The academic year label `YYYY/YYYY` starts with
//! the same year.

use chrono::{DateTime, NaiveDate, Utc};
use registrar_core::serde::deserialize_trimmed_string;
use registrar_core::{PaginationParams, SortParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::enums::TermName;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Term {
    /// e.g. `20241`
    pub id_semester: String,
    /// e.g. `2024/2025`
    pub tahun_ajaran: String,
    pub term: TermName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tanggal_mulai: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tanggal_selesai: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateTermDto {
    #[serde(default)]
    pub id_semester: String,
    #[serde(default)]
    pub tahun_ajaran: String,
    /// Ganjil, Genap or Antara; must match the id's last digit
    #[serde(default)]
    pub term: String,
    /// `YYYY-MM-DD`
    pub tanggal_mulai: Option<String>,
    /// `YYYY-MM-DD`, strictly after `tanggal_mulai`
    pub tanggal_selesai: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReplaceTermDto {
    #[serde(default)]
    pub tahun_ajaran: String,
    #[serde(default)]
    pub term: String,
    pub tanggal_mulai: Option<String>,
    pub tanggal_selesai: Option<String>,
}

impl From<CreateTermDto> for ReplaceTermDto {
    fn from(dto: CreateTermDto) -> Self {
        Self {
            tahun_ajaran: dto.tahun_ajaran,
            term: dto.term,
            tanggal_mulai: dto.tanggal_mulai,
            tanggal_selesai: dto.tanggal_selesai,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatchTermDto {
    pub tahun_ajaran: Option<String>,
    pub term: Option<String>,
    pub tanggal_mulai: Option<String>,
    pub tanggal_selesai: Option<String>,
}

/// A fully validated term ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTerm {
    pub id_semester: String,
    pub fields: TermFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFields {
    pub tahun_ajaran: String,
    pub term: TermName,
    pub tanggal_mulai: Option<NaiveDate>,
    pub tanggal_selesai: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermPatch {
    pub tahun_ajaran: Option<String>,
    pub term: Option<TermName>,
    pub tanggal_mulai: Option<NaiveDate>,
    pub tanggal_selesai: Option<NaiveDate>,
}

impl TermPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFilter {
    pub q: Option<String>,
    pub tahun_ajaran: Option<String>,
    pub term: Option<TermName>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct TermListParams {
    /// Search on id, academic year or term name
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(max = 100))]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub tahun_ajaran: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub term: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
    #[serde(flatten)]
    pub sort: SortParams,
}

/// `dry_run` query flag of the CSV import. Only `true` (any case) is a dry
/// run; absent means `true`.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ImportParams {
    pub dry_run: Option<String>,
}

impl ImportParams {
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
            .as_deref()
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_dry_run_flag() {
        let params = |v: Option<&str>| ImportParams {
            dry_run: v.map(str::to_string),
        };
        assert!(params(None).is_dry_run());
        assert!(params(Some("TRUE")).is_dry_run());
        assert!(!params(Some("false")).is_dry_run());
        assert!(!params(Some("yes")).is_dry_run());
        assert!(!params(Some("")).is_dry_run());
    }
}
