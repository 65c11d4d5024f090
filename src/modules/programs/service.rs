use registrar_core::validation::{self, normalize_optional};
use registrar_core::{AppError, AppResult};
use registrar_models::{Accreditation, DegreeLevel, ListResponse};
use tracing::{debug, info, instrument, warn};

use crate::utils::id_generator;

use super::model::{
    CreateProgramDto, DEFAULT_ORDER, PatchProgramDto, Program, ProgramFields, ProgramFilter,
    ProgramListParams, ProgramPatch, ReplaceProgramDto, SORT_COLUMNS,
};
use super::repository::ProgramRepository;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 120;
const ID_PREFIX: &str = "PRD";

const PROGRAM_EXISTS: &str = "study program already exists";

pub struct ProgramService;

impl ProgramService {
    fn faculty_ref(value: &str) -> AppResult<String> {
        if value.trim().is_empty() {
            return Err(AppError::invalid_input("id_fakultas is required"));
        }
        validation::faculty_id(value)
    }

    fn accreditation(value: Option<String>) -> AppResult<Option<Accreditation>> {
        normalize_optional(value)
            .map(|v| v.parse::<Accreditation>())
            .transpose()
    }

    fn fields(dto: ReplaceProgramDto) -> AppResult<ProgramFields> {
        Ok(ProgramFields {
            id_fakultas: Self::faculty_ref(&dto.id_fakultas)?,
            nama_prodi: validation::text("nama_prodi", &dto.nama_prodi, NAME_MIN, NAME_MAX)?,
            jenjang: DegreeLevel::parse_trimmed(&dto.jenjang)?,
            kode_prodi: validation::program_code(&dto.kode_prodi)?,
            akreditasi: Self::accreditation(dto.akreditasi)?,
        })
    }

    /// Storage checks shared by create and replace, in precedence order:
    /// code, faculty/level/name triple, faculty reference.
    async fn check_constraints(
        repo: &dyn ProgramRepository,
        fields: &ProgramFields,
        exclude_id: Option<&str>,
    ) -> AppResult<()> {
        if repo.exists_code(&fields.kode_prodi, exclude_id).await? {
            warn!(program.code = %fields.kode_prodi, "program code already exists");
            return Err(AppError::conflict("kode_prodi already exists"));
        }
        Self::ensure_name_free(
            repo,
            &fields.id_fakultas,
            fields.jenjang,
            &fields.nama_prodi,
            exclude_id,
        )
        .await?;
        Self::ensure_faculty_exists(repo, &fields.id_fakultas).await
    }

    async fn ensure_name_free(
        repo: &dyn ProgramRepository,
        id_fakultas: &str,
        jenjang: DegreeLevel,
        name: &str,
        exclude_id: Option<&str>,
    ) -> AppResult<()> {
        if repo
            .exists_name_in_faculty_level(id_fakultas, jenjang, name, exclude_id)
            .await?
        {
            return Err(AppError::conflict(
                "nama_prodi already exists for this faculty and level",
            ));
        }
        Ok(())
    }

    async fn ensure_faculty_exists(repo: &dyn ProgramRepository, id_fakultas: &str) -> AppResult<()> {
        if !repo.exists_faculty(id_fakultas).await? {
            return Err(AppError::unprocessable(
                "id_fakultas does not reference an existing faculty",
            ));
        }
        Ok(())
    }

    #[instrument(skip(repo))]
    pub async fn list(
        repo: &dyn ProgramRepository,
        params: ProgramListParams,
    ) -> AppResult<ListResponse<Program>> {
        let page = params
            .pagination
            .page_request(params.sort.resolve(SORT_COLUMNS, DEFAULT_ORDER))?;
        page.validate()?;

        let filter = ProgramFilter {
            q: normalize_optional(params.q),
            id_fakultas: normalize_optional(params.id_fakultas)
                .map(|id| validation::faculty_id(&id))
                .transpose()?,
            jenjang: normalize_optional(params.jenjang)
                .map(|v| v.parse::<DegreeLevel>())
                .transpose()?,
            akreditasi: Self::accreditation(params.akreditasi)?,
        };

        let data = repo.list(&filter, &page).await?;
        Ok(ListResponse {
            data,
            meta: params.pagination.meta(),
        })
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn ProgramRepository, id: &str) -> AppResult<Program> {
        let id = validation::program_id(id)?;
        repo.get(&id)
            .await?
            .ok_or_else(|| AppError::not_found("study program not found"))
    }

    #[instrument(skip(repo))]
    pub async fn create(repo: &dyn ProgramRepository, dto: CreateProgramDto) -> AppResult<Program> {
        let requested_id = normalize_optional(dto.id_prodi.clone())
            .map(|id| validation::program_id(&id))
            .transpose()?;
        let fields = Self::fields(dto.into())?;

        let id = match requested_id {
            Some(id) => {
                if repo.exists_id(&id).await? {
                    return Err(AppError::conflict("id_prodi already exists"));
                }
                id
            }
            None => {
                id_generator::generate_unique(
                    || id_generator::numbered(ID_PREFIX),
                    |candidate| async move { repo.exists_id(&candidate).await },
                )
                .await?
            }
        };
        debug!(program.id = %id, "program id resolved");

        Self::check_constraints(repo, &fields, None).await?;

        let program = repo
            .create(&id, &fields)
            .await
            .map_err(|e| e.into_write_error(PROGRAM_EXISTS))?;

        info!(program.id = %program.id_prodi, program.code = %program.kode_prodi, "study program created");
        Ok(program)
    }

    #[instrument(skip(repo))]
    pub async fn replace(
        repo: &dyn ProgramRepository,
        id: &str,
        dto: ReplaceProgramDto,
    ) -> AppResult<Program> {
        let id = validation::program_id(id)?;
        let fields = Self::fields(dto)?;

        Self::check_constraints(repo, &fields, Some(&id)).await?;

        repo.replace(&id, &fields)
            .await
            .map_err(|e| e.into_write_error(PROGRAM_EXISTS))?
            .ok_or_else(|| AppError::not_found("study program not found"))
    }

    /// Applies the supplied fields. The current row is read only when the
    /// faculty, level or name changes, to check the triple against siblings.
    #[instrument(skip(repo))]
    pub async fn update(
        repo: &dyn ProgramRepository,
        id: &str,
        dto: PatchProgramDto,
    ) -> AppResult<Program> {
        let id = validation::program_id(id)?;
        let patch = ProgramPatch {
            id_fakultas: dto
                .id_fakultas
                .map(|v| {
                    if v.trim().is_empty() {
                        Err(AppError::invalid_input("id_fakultas cannot be empty"))
                    } else {
                        validation::faculty_id(&v)
                    }
                })
                .transpose()?,
            nama_prodi: dto
                .nama_prodi
                .map(|v| validation::text("nama_prodi", &v, NAME_MIN, NAME_MAX))
                .transpose()?,
            jenjang: dto
                .jenjang
                .map(|v| DegreeLevel::parse_trimmed(&v))
                .transpose()?,
            kode_prodi: dto
                .kode_prodi
                .map(|v| validation::program_code(&v))
                .transpose()?,
            akreditasi: Self::accreditation(dto.akreditasi)?,
        };

        if let Some(kode) = &patch.kode_prodi
            && repo.exists_code(kode, Some(&id)).await?
        {
            return Err(AppError::conflict("kode_prodi already exists"));
        }

        if patch.id_fakultas.is_some() || patch.jenjang.is_some() || patch.nama_prodi.is_some() {
            let current = repo
                .get(&id)
                .await?
                .ok_or_else(|| AppError::not_found("study program not found"))?;
            let id_fakultas = patch.id_fakultas.as_deref().unwrap_or(&current.id_fakultas);
            let jenjang = patch.jenjang.unwrap_or(current.jenjang);
            let name = patch.nama_prodi.as_deref().unwrap_or(&current.nama_prodi);
            Self::ensure_name_free(repo, id_fakultas, jenjang, name, Some(&id)).await?;
        }

        if let Some(id_fakultas) = &patch.id_fakultas {
            Self::ensure_faculty_exists(repo, id_fakultas).await?;
        }

        repo.update(&id, &patch)
            .await
            .map_err(|e| e.into_write_error(PROGRAM_EXISTS))?
            .ok_or_else(|| AppError::not_found("study program not found"))
    }

    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn ProgramRepository, id: &str) -> AppResult<String> {
        let id = validation::program_id(id)?;

        if repo.has_students(&id).await? {
            return Err(AppError::conflict("study program still has students"));
        }
        if repo.has_courses(&id).await? {
            return Err(AppError::conflict("study program still has courses"));
        }

        let deleted = repo
            .delete(&id)
            .await
            .map_err(|e| e.into_delete_error("study program is still referenced"))?;
        if !deleted {
            return Err(AppError::not_found("study program not found"));
        }

        info!(program.id = %id, "study program deleted");
        Ok(id)
    }
}
