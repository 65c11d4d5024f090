//! Student (mahasiswa) models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use registrar_core::serde::{deserialize_optional_i32, deserialize_trimmed_string};
use registrar_core::{PaginationParams, SortParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::enums::{Sex, StudentStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    /// Registration number (NIM), 12 alphanumeric characters
    pub id_mahasiswa: String,
    pub id_prodi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nik: Option<String>,
    pub nama_lengkap: String,
    pub jenis_kelamin: Sex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempat_lahir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tanggal_lahir: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alamat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_hp: Option<String>,
    pub tahun_masuk: i32,
    pub status: StudentStatus,
    /// Cohort, derived by the database from `tahun_masuk`
    pub angkatan: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateStudentDto {
    #[serde(default)]
    pub id_mahasiswa: String,
    #[serde(default)]
    pub id_prodi: String,
    pub nik: Option<String>,
    #[serde(default)]
    pub nama_lengkap: String,
    /// `L` or `P`
    #[serde(default)]
    pub jenis_kelamin: String,
    pub tempat_lahir: Option<String>,
    /// `YYYY-MM-DD`
    pub tanggal_lahir: Option<String>,
    pub alamat: Option<String>,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    #[serde(default)]
    pub tahun_masuk: i32,
    /// Defaults to `Aktif`
    pub status: Option<String>,
}

/// Body of `PUT /mahasiswa/{id}`. Unlike create, `status` is required.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReplaceStudentDto {
    #[serde(default)]
    pub id_prodi: String,
    pub nik: Option<String>,
    #[serde(default)]
    pub nama_lengkap: String,
    #[serde(default)]
    pub jenis_kelamin: String,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub alamat: Option<String>,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    #[serde(default)]
    pub tahun_masuk: i32,
    pub status: Option<String>,
}

impl From<CreateStudentDto> for ReplaceStudentDto {
    fn from(dto: CreateStudentDto) -> Self {
        Self {
            id_prodi: dto.id_prodi,
            nik: dto.nik,
            nama_lengkap: dto.nama_lengkap,
            jenis_kelamin: dto.jenis_kelamin,
            tempat_lahir: dto.tempat_lahir,
            tanggal_lahir: dto.tanggal_lahir,
            alamat: dto.alamat,
            email: dto.email,
            no_hp: dto.no_hp,
            tahun_masuk: dto.tahun_masuk,
            status: dto.status,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatchStudentDto {
    pub id_prodi: Option<String>,
    pub nik: Option<String>,
    pub nama_lengkap: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub alamat: Option<String>,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    pub tahun_masuk: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
    pub id_prodi: String,
    pub nik: Option<String>,
    pub nama_lengkap: String,
    pub jenis_kelamin: Sex,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<NaiveDate>,
    pub alamat: Option<String>,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    pub tahun_masuk: i32,
    pub status: StudentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub id_prodi: Option<String>,
    pub nik: Option<String>,
    pub nama_lengkap: Option<String>,
    pub jenis_kelamin: Option<Sex>,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<NaiveDate>,
    pub alamat: Option<String>,
    pub email: Option<String>,
    pub no_hp: Option<String>,
    pub tahun_masuk: Option<i32>,
    pub status: Option<StudentStatus>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub q: Option<String>,
    pub id_prodi: Option<String>,
    pub angkatan: Option<i32>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StudentListParams {
    /// Search on name, email or registration number
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(max = 100))]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub id_prodi: Option<String>,
    /// Cohort year; values below 1 are ignored
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub angkatan: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
    #[serde(flatten)]
    pub sort: SortParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let now = Utc::now();
        let student = Student {
            id_mahasiswa: "220101010001".into(),
            id_prodi: "PRD00001".into(),
            nik: None,
            nama_lengkap: "Budi Santoso".into(),
            jenis_kelamin: Sex::Male,
            tempat_lahir: None,
            tanggal_lahir: NaiveDate::from_ymd_opt(2004, 5, 17),
            alamat: None,
            email: None,
            no_hp: None,
            tahun_masuk: 2022,
            status: StudentStatus::Active,
            angkatan: 2022,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&student).unwrap();
        assert!(json.get("nik").is_none());
        assert_eq!(json["tanggal_lahir"], "2004-05-17");
        assert_eq!(json["jenis_kelamin"], "L");
        assert_eq!(json["status"], "Aktif");
    }

    #[test]
    fn test_empty_patch() {
        assert!(StudentPatch::default().is_empty());
        let patch = StudentPatch {
            tahun_masuk: Some(2023),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
