use registrar_core::validation::{self, normalize_optional};
use registrar_core::{AppError, AppResult};
use registrar_models::{ListResponse, Sex, StudentStatus};
use tracing::{info, instrument, warn};

use super::model::{
    CreateStudentDto, DEFAULT_ORDER, PatchStudentDto, ReplaceStudentDto, SORT_COLUMNS, Student,
    StudentFields, StudentFilter, StudentListParams, StudentPatch,
};
use super::repository::StudentRepository;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 120;
const BIRTHPLACE_MAX: usize = 80;

const STUDENT_EXISTS: &str = "student id, nik or email already exists";

pub struct StudentService;

impl StudentService {
    fn program_ref(value: &str) -> AppResult<String> {
        if value.trim().is_empty() {
            return Err(AppError::invalid_input("id_prodi is required"));
        }
        validation::program_id(value)
    }

    fn status(value: &str) -> AppResult<StudentStatus> {
        StudentStatus::parse_trimmed(value)
    }

    /// Validates every column. `status` is resolved by the caller since
    /// create and replace treat a missing status differently.
    fn fields(dto: ReplaceStudentDto, status: StudentStatus) -> AppResult<StudentFields> {
        Ok(StudentFields {
            id_prodi: Self::program_ref(&dto.id_prodi)?,
            nik: validation::optional_nik(dto.nik)?,
            nama_lengkap: validation::text("nama_lengkap", &dto.nama_lengkap, NAME_MIN, NAME_MAX)?,
            jenis_kelamin: Sex::parse_trimmed(&dto.jenis_kelamin)?,
            tempat_lahir: validation::optional_text("tempat_lahir", dto.tempat_lahir, BIRTHPLACE_MAX)?,
            tanggal_lahir: validation::optional_date("tanggal_lahir", dto.tanggal_lahir)?,
            alamat: normalize_optional(dto.alamat),
            email: validation::optional_email(dto.email)?,
            no_hp: validation::optional_student_phone(dto.no_hp)?,
            tahun_masuk: validation::entry_year(dto.tahun_masuk)?,
            status,
        })
    }

    async fn ensure_unique(
        repo: &dyn StudentRepository,
        email: Option<&str>,
        nik: Option<&str>,
        exclude_id: Option<&str>,
    ) -> AppResult<()> {
        if let Some(email) = email
            && repo.exists_email(email, exclude_id).await?
        {
            return Err(AppError::conflict("email already exists"));
        }
        if let Some(nik) = nik
            && repo.exists_nik(nik, exclude_id).await?
        {
            warn!("student nik already exists");
            return Err(AppError::conflict("nik already exists"));
        }
        Ok(())
    }

    async fn ensure_program_exists(repo: &dyn StudentRepository, id_prodi: &str) -> AppResult<()> {
        if !repo.exists_program(id_prodi).await? {
            return Err(AppError::unprocessable(
                "id_prodi does not reference an existing study program",
            ));
        }
        Ok(())
    }

    #[instrument(skip(repo))]
    pub async fn list(
        repo: &dyn StudentRepository,
        params: StudentListParams,
    ) -> AppResult<ListResponse<Student>> {
        let page = params
            .pagination
            .page_request(params.sort.resolve(SORT_COLUMNS, DEFAULT_ORDER))?;
        page.validate()?;

        let filter = StudentFilter {
            q: normalize_optional(params.q),
            id_prodi: normalize_optional(params.id_prodi)
                .map(|id| validation::program_id(&id))
                .transpose()?,
            angkatan: params.angkatan.filter(|year| *year > 0),
            status: normalize_optional(params.status)
                .map(|v| v.parse::<StudentStatus>())
                .transpose()?,
        };

        let data = repo.list(&filter, &page).await?;
        Ok(ListResponse {
            data,
            meta: params.pagination.meta(),
        })
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn StudentRepository, id: &str) -> AppResult<Student> {
        let id = validation::student_id(id)?;
        repo.get(&id)
            .await?
            .ok_or_else(|| AppError::not_found("student not found"))
    }

    /// Registration numbers are always supplied by the caller. A missing
    /// status defaults to `Aktif`.
    #[instrument(skip(repo))]
    pub async fn create(repo: &dyn StudentRepository, dto: CreateStudentDto) -> AppResult<Student> {
        if dto.id_mahasiswa.trim().is_empty() {
            return Err(AppError::invalid_input("id_mahasiswa is required"));
        }
        let id = validation::student_id(&dto.id_mahasiswa)?;
        let status = normalize_optional(dto.status.clone())
            .map(|v| Self::status(&v))
            .transpose()?
            .unwrap_or_default();
        let fields = Self::fields(dto.into(), status)?;

        if repo.exists_id(&id).await? {
            return Err(AppError::conflict("id_mahasiswa already exists"));
        }
        Self::ensure_unique(repo, fields.email.as_deref(), fields.nik.as_deref(), None).await?;
        Self::ensure_program_exists(repo, &fields.id_prodi).await?;

        let student = repo
            .create(&id, &fields)
            .await
            .map_err(|e| e.into_write_error(STUDENT_EXISTS))?;

        info!(student.id = %student.id_mahasiswa, student.program = %student.id_prodi, "student created");
        Ok(student)
    }

    /// Full replacement. Unlike create, `status` must be present.
    #[instrument(skip(repo))]
    pub async fn replace(
        repo: &dyn StudentRepository,
        id: &str,
        dto: ReplaceStudentDto,
    ) -> AppResult<Student> {
        let id = validation::student_id(id)?;
        let status = match normalize_optional(dto.status.clone()) {
            Some(v) => Self::status(&v)?,
            None => return Err(AppError::invalid_input("status is required")),
        };
        let fields = Self::fields(dto, status)?;

        Self::ensure_unique(
            repo,
            fields.email.as_deref(),
            fields.nik.as_deref(),
            Some(&id),
        )
        .await?;
        Self::ensure_program_exists(repo, &fields.id_prodi).await?;

        repo.replace(&id, &fields)
            .await
            .map_err(|e| e.into_write_error(STUDENT_EXISTS))?
            .ok_or_else(|| AppError::not_found("student not found"))
    }

    /// Blank optional values leave the column unchanged.
    #[instrument(skip(repo))]
    pub async fn update(
        repo: &dyn StudentRepository,
        id: &str,
        dto: PatchStudentDto,
    ) -> AppResult<Student> {
        let id = validation::student_id(id)?;
        let patch = StudentPatch {
            id_prodi: dto
                .id_prodi
                .map(|v| {
                    if v.trim().is_empty() {
                        Err(AppError::invalid_input("id_prodi cannot be empty"))
                    } else {
                        validation::program_id(&v)
                    }
                })
                .transpose()?,
            nik: validation::optional_nik(dto.nik)?,
            nama_lengkap: dto
                .nama_lengkap
                .map(|v| validation::text("nama_lengkap", &v, NAME_MIN, NAME_MAX))
                .transpose()?,
            jenis_kelamin: normalize_optional(dto.jenis_kelamin)
                .map(|v| v.parse::<Sex>())
                .transpose()?,
            tempat_lahir: validation::optional_text(
                "tempat_lahir",
                dto.tempat_lahir,
                BIRTHPLACE_MAX,
            )?,
            tanggal_lahir: validation::optional_date("tanggal_lahir", dto.tanggal_lahir)?,
            alamat: normalize_optional(dto.alamat),
            email: validation::optional_email(dto.email)?,
            no_hp: validation::optional_student_phone(dto.no_hp)?,
            tahun_masuk: dto.tahun_masuk.map(validation::entry_year).transpose()?,
            status: normalize_optional(dto.status)
                .map(|v| Self::status(&v))
                .transpose()?,
        };

        Self::ensure_unique(
            repo,
            patch.email.as_deref(),
            patch.nik.as_deref(),
            Some(&id),
        )
        .await?;
        if let Some(id_prodi) = &patch.id_prodi {
            Self::ensure_program_exists(repo, id_prodi).await?;
        }

        repo.update(&id, &patch)
            .await
            .map_err(|e| e.into_write_error(STUDENT_EXISTS))?
            .ok_or_else(|| AppError::not_found("student not found"))
    }

    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn StudentRepository, id: &str) -> AppResult<String> {
        let id = validation::student_id(id)?;

        if repo.has_registrations(&id).await? {
            return Err(AppError::conflict("student still has course registrations"));
        }

        let deleted = repo
            .delete(&id)
            .await
            .map_err(|e| e.into_delete_error("student is still referenced"))?;
        if !deleted {
            return Err(AppError::not_found("student not found"));
        }

        info!(student.id = %id, "student deleted");
        Ok(id)
    }
}
