//! Study program (prodi) models and DTOs.

use chrono::{DateTime, Utc};
use registrar_core::serde::deserialize_trimmed_string;
use registrar_core::{PaginationParams, SortParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::enums::{Accreditation, DegreeLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Program {
    pub id_prodi: String,
    pub id_fakultas: String,
    pub nama_prodi: String,
    pub jenjang: DegreeLevel,
    pub kode_prodi: String,
    pub akreditasi: Option<Accreditation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateProgramDto {
    pub id_prodi: Option<String>,
    #[serde(default)]
    pub id_fakultas: String,
    #[serde(default)]
    pub nama_prodi: String,
    /// One of D3, D4, S1, S2, S3
    #[serde(default)]
    pub jenjang: String,
    #[serde(default)]
    pub kode_prodi: String,
    /// One of A, B, C, Baik, Baik Sekali, Unggul
    pub akreditasi: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReplaceProgramDto {
    #[serde(default)]
    pub id_fakultas: String,
    #[serde(default)]
    pub nama_prodi: String,
    #[serde(default)]
    pub jenjang: String,
    #[serde(default)]
    pub kode_prodi: String,
    pub akreditasi: Option<String>,
}

impl From<CreateProgramDto> for ReplaceProgramDto {
    fn from(dto: CreateProgramDto) -> Self {
        Self {
            id_fakultas: dto.id_fakultas,
            nama_prodi: dto.nama_prodi,
            jenjang: dto.jenjang,
            kode_prodi: dto.kode_prodi,
            akreditasi: dto.akreditasi,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatchProgramDto {
    pub id_fakultas: Option<String>,
    pub nama_prodi: Option<String>,
    pub jenjang: Option<String>,
    pub kode_prodi: Option<String>,
    pub akreditasi: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramFields {
    pub id_fakultas: String,
    pub nama_prodi: String,
    pub jenjang: DegreeLevel,
    pub kode_prodi: String,
    pub akreditasi: Option<Accreditation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramPatch {
    pub id_fakultas: Option<String>,
    pub nama_prodi: Option<String>,
    pub jenjang: Option<DegreeLevel>,
    pub kode_prodi: Option<String>,
    pub akreditasi: Option<Accreditation>,
}

impl ProgramPatch {
    pub fn is_empty(&self) -> bool {
        self.id_fakultas.is_none()
            && self.nama_prodi.is_none()
            && self.jenjang.is_none()
            && self.kode_prodi.is_none()
            && self.akreditasi.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramFilter {
    pub q: Option<String>,
    pub id_fakultas: Option<String>,
    pub jenjang: Option<DegreeLevel>,
    pub akreditasi: Option<Accreditation>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ProgramListParams {
    /// Search on program name or code
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(max = 100))]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub id_fakultas: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub jenjang: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub akreditasi: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
    #[serde(flatten)]
    pub sort: SortParams,
}
