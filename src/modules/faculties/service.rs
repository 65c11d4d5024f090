use registrar_core::validation::{self, normalize_optional};
use registrar_core::{AppError, AppResult};
use registrar_models::ListResponse;
use tracing::{debug, info, instrument, warn};

use crate::utils::id_generator;

use super::model::{
    CreateFacultyDto, DEFAULT_ORDER, Faculty, FacultyFields, FacultyFilter, FacultyListParams,
    FacultyPatch, PatchFacultyDto, ReplaceFacultyDto, SORT_COLUMNS,
};
use super::repository::FacultyRepository;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 100;
const ABBREVIATION_MAX: usize = 20;
const ID_PREFIX: &str = "FAK";

const NAME_TAKEN: &str = "faculty name already exists";

pub struct FacultyService;

impl FacultyService {
    fn fields(nama_fakultas: &str, singkatan: Option<String>) -> AppResult<FacultyFields> {
        Ok(FacultyFields {
            nama_fakultas: validation::text("nama_fakultas", nama_fakultas, NAME_MIN, NAME_MAX)?,
            singkatan: validation::optional_text("singkatan", singkatan, ABBREVIATION_MAX)?,
        })
    }

    async fn ensure_name_free(
        repo: &dyn FacultyRepository,
        name: &str,
        exclude_id: Option<&str>,
    ) -> AppResult<()> {
        if repo.exists_name(name, exclude_id).await? {
            warn!(faculty.name = %name, "faculty name already exists");
            return Err(AppError::conflict(NAME_TAKEN));
        }
        Ok(())
    }

    #[instrument(skip(repo))]
    pub async fn list(
        repo: &dyn FacultyRepository,
        params: FacultyListParams,
    ) -> AppResult<ListResponse<Faculty>> {
        let page = params
            .pagination
            .page_request(params.sort.resolve(SORT_COLUMNS, DEFAULT_ORDER))?;
        page.validate()?;
        let filter = FacultyFilter {
            q: normalize_optional(params.q),
        };

        let data = repo.list(&filter, &page).await?;
        Ok(ListResponse {
            data,
            meta: params.pagination.meta(),
        })
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn FacultyRepository, id: &str) -> AppResult<Faculty> {
        let id = validation::faculty_id(id)?;
        repo.get(&id)
            .await?
            .ok_or_else(|| AppError::not_found("faculty not found"))
    }

    #[instrument(skip(repo))]
    pub async fn create(repo: &dyn FacultyRepository, dto: CreateFacultyDto) -> AppResult<Faculty> {
        let requested_id = normalize_optional(dto.id_fakultas)
            .map(|id| validation::faculty_id(&id))
            .transpose()?;
        let fields = Self::fields(&dto.nama_fakultas, dto.singkatan)?;

        let id = match requested_id {
            Some(id) => {
                if repo.exists_id(&id).await? {
                    return Err(AppError::conflict("id_fakultas already exists"));
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
        debug!(faculty.id = %id, "faculty id resolved");

        Self::ensure_name_free(repo, &fields.nama_fakultas, None).await?;

        let faculty = repo
            .create(&id, &fields)
            .await
            .map_err(|e| e.into_write_error(NAME_TAKEN))?;

        info!(faculty.id = %faculty.id_fakultas, "faculty created");
        Ok(faculty)
    }

    #[instrument(skip(repo))]
    pub async fn replace(
        repo: &dyn FacultyRepository,
        id: &str,
        dto: ReplaceFacultyDto,
    ) -> AppResult<Faculty> {
        let id = validation::faculty_id(id)?;
        let fields = Self::fields(&dto.nama_fakultas, dto.singkatan)?;

        Self::ensure_name_free(repo, &fields.nama_fakultas, Some(&id)).await?;

        repo.replace(&id, &fields)
            .await
            .map_err(|e| e.into_write_error(NAME_TAKEN))?
            .ok_or_else(|| AppError::not_found("faculty not found"))
    }

    #[instrument(skip(repo))]
    pub async fn update(
        repo: &dyn FacultyRepository,
        id: &str,
        dto: PatchFacultyDto,
    ) -> AppResult<Faculty> {
        let id = validation::faculty_id(id)?;
        let patch = FacultyPatch {
            nama_fakultas: dto
                .nama_fakultas
                .map(|name| validation::text("nama_fakultas", &name, NAME_MIN, NAME_MAX))
                .transpose()?,
            singkatan: validation::optional_text("singkatan", dto.singkatan, ABBREVIATION_MAX)?,
        };

        if let Some(name) = &patch.nama_fakultas {
            Self::ensure_name_free(repo, name, Some(&id)).await?;
        }

        repo.update(&id, &patch)
            .await
            .map_err(|e| e.into_write_error(NAME_TAKEN))?
            .ok_or_else(|| AppError::not_found("faculty not found"))
    }

    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn FacultyRepository, id: &str) -> AppResult<String> {
        let id = validation::faculty_id(id)?;

        if repo.has_programs(&id).await? {
            return Err(AppError::conflict("faculty still has study programs"));
        }

        let deleted = repo
            .delete(&id)
            .await
            .map_err(|e| e.into_delete_error("faculty still has study programs"))?;
        if !deleted {
            return Err(AppError::not_found("faculty not found"));
        }

        info!(faculty.id = %id, "faculty deleted");
        Ok(id)
    }
}
