//! Lecturer (dosen) models and DTOs.

use chrono::{DateTime, Utc};
use registrar_core::serde::deserialize_trimmed_string;
use registrar_core::{PaginationParams, SortParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lecturer {
    /// 10 alphanumeric characters
    pub id_dosen: String,
    pub nidn: Option<String>,
    pub nama_dosen: String,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    pub jabatan_akademik: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateLecturerDto {
    pub id_dosen: Option<String>,
    pub nidn: Option<String>,
    #[serde(default)]
    pub nama_dosen: String,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    pub jabatan_akademik: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReplaceLecturerDto {
    pub nidn: Option<String>,
    #[serde(default)]
    pub nama_dosen: String,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    pub jabatan_akademik: Option<String>,
}

impl From<CreateLecturerDto> for ReplaceLecturerDto {
    fn from(dto: CreateLecturerDto) -> Self {
        Self {
            nidn: dto.nidn,
            nama_dosen: dto.nama_dosen,
            email: dto.email,
            no_hp: dto.no_hp,
            jabatan_akademik: dto.jabatan_akademik,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatchLecturerDto {
    pub nidn: Option<String>,
    pub nama_dosen: Option<String>,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    pub jabatan_akademik: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LecturerFields {
    pub nidn: Option<String>,
    pub nama_dosen: String,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    pub jabatan_akademik: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LecturerPatch {
    pub nidn: Option<String>,
    pub nama_dosen: Option<String>,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    pub jabatan_akademik: Option<String>,
}

impl LecturerPatch {
    pub fn is_empty(&self) -> bool {
        self.nidn.is_none()
            && self.nama_dosen.is_none()
            && self.email.is_none()
            && self.no_hp.is_none()
            && self.jabatan_akademik.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LecturerFilter {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LecturerListParams {
    /// Search on name, NIDN or email
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(max = 100))]
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
    #[serde(flatten)]
    pub sort: SortParams,
}
