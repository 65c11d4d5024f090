//! Faculty (fakultas) models and DTOs.

use chrono::{DateTime, Utc};
use registrar_core::{PaginationParams, SortParams};
use registrar_core::serde::deserialize_trimmed_string;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Faculty {
    /// 8 alphanumeric characters, e.g. `FAK00001`
    pub id_fakultas: String,
    pub nama_fakultas: String,
    pub singkatan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /fakultas`. A blank or missing id is generated.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateFacultyDto {
    pub id_fakultas: Option<String>,
    #[serde(default)]
    pub nama_fakultas: String,
    pub singkatan: Option<String>,
}

/// Body of `PUT /fakultas/{id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReplaceFacultyDto {
    #[serde(default)]
    pub nama_fakultas: String,
    pub singkatan: Option<String>,
}

/// Body of `PATCH /fakultas/{id}`. Absent or blank fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatchFacultyDto {
    pub nama_fakultas: Option<String>,
    pub singkatan: Option<String>,
}

/// Validated mutable columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacultyFields {
    pub nama_fakultas: String,
    pub singkatan: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyPatch {
    pub nama_fakultas: Option<String>,
    pub singkatan: Option<String>,
}

impl FacultyPatch {
    pub fn is_empty(&self) -> bool {
        self.nama_fakultas.is_none() && self.singkatan.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyFilter {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct FacultyListParams {
    /// Case-insensitive search on the faculty name
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(max = 100))]
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
    #[serde(flatten)]
    pub sort: SortParams,
}
