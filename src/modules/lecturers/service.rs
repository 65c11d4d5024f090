use registrar_core::validation::{self, normalize_optional};
use registrar_core::{AppError, AppResult};
use registrar_models::ListResponse;
use tracing::{debug, info, instrument, warn};

use crate::utils::id_generator;

use super::model::{
    CreateLecturerDto, DEFAULT_ORDER, Lecturer, LecturerFields, LecturerFilter,
    LecturerListParams, LecturerPatch, PatchLecturerDto, ReplaceLecturerDto, SORT_COLUMNS,
};
use super::repository::LecturerRepository;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 120;
const RANK_MAX: usize = 60;
const ID_LEN: usize = 10;

const LECTURER_EXISTS: &str = "lecturer nidn or email already exists";

pub struct LecturerService;

impl LecturerService {
    fn fields(dto: ReplaceLecturerDto) -> AppResult<LecturerFields> {
        Ok(LecturerFields {
            nidn: validation::optional_nidn(dto.nidn)?,
            nama_dosen: validation::text("nama_dosen", &dto.nama_dosen, NAME_MIN, NAME_MAX)?,
            email: validation::optional_email(dto.email)?,
            no_hp: validation::optional_lecturer_phone(dto.no_hp)?,
            jabatan_akademik: validation::optional_text(
                "jabatan_akademik",
                dto.jabatan_akademik,
                RANK_MAX,
            )?,
        })
    }

    /// NIDN then email, each only when present.
    async fn ensure_unique(
        repo: &dyn LecturerRepository,
        nidn: Option<&str>,
        email: Option<&str>,
        exclude_id: Option<&str>,
    ) -> AppResult<()> {
        if let Some(nidn) = nidn
            && repo.exists_nidn(nidn, exclude_id).await?
        {
            warn!(lecturer.nidn = %nidn, "nidn already exists");
            return Err(AppError::conflict("nidn already exists"));
        }
        if let Some(email) = email
            && repo.exists_email(email, exclude_id).await?
        {
            return Err(AppError::conflict("email already exists"));
        }
        Ok(())
    }

    #[instrument(skip(repo))]
    pub async fn list(
        repo: &dyn LecturerRepository,
        params: LecturerListParams,
    ) -> AppResult<ListResponse<Lecturer>> {
        let page = params
            .pagination
            .page_request(params.sort.resolve(SORT_COLUMNS, DEFAULT_ORDER))?;
        page.validate()?;
        let filter = LecturerFilter {
            q: normalize_optional(params.q),
        };

        let data = repo.list(&filter, &page).await?;
        Ok(ListResponse {
            data,
            meta: params.pagination.meta(),
        })
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn LecturerRepository, id: &str) -> AppResult<Lecturer> {
        let id = validation::lecturer_id(id)?;
        repo.get(&id)
            .await?
            .ok_or_else(|| AppError::not_found("lecturer not found"))
    }

    #[instrument(skip(repo))]
    pub async fn create(
        repo: &dyn LecturerRepository,
        dto: CreateLecturerDto,
    ) -> AppResult<Lecturer> {
        let requested_id = normalize_optional(dto.id_dosen.clone())
            .map(|id| validation::lecturer_id(&id))
            .transpose()?;
        let fields = Self::fields(dto.into())?;

        let id = match requested_id {
            Some(id) => {
                if repo.exists_id(&id).await? {
                    return Err(AppError::conflict("id_dosen already exists"));
                }
                id
            }
            None => {
                id_generator::generate_unique(
                    || id_generator::alphanumeric(ID_LEN),
                    |candidate| async move { repo.exists_id(&candidate).await },
                )
                .await?
            }
        };
        debug!(lecturer.id = %id, "lecturer id resolved");

        Self::ensure_unique(repo, fields.nidn.as_deref(), fields.email.as_deref(), None).await?;

        let lecturer = repo
            .create(&id, &fields)
            .await
            .map_err(|e| e.into_write_error(LECTURER_EXISTS))?;

        info!(lecturer.id = %lecturer.id_dosen, "lecturer created");
        Ok(lecturer)
    }

    #[instrument(skip(repo))]
    pub async fn replace(
        repo: &dyn LecturerRepository,
        id: &str,
        dto: ReplaceLecturerDto,
    ) -> AppResult<Lecturer> {
        let id = validation::lecturer_id(id)?;
        let fields = Self::fields(dto)?;

        Self::ensure_unique(
            repo,
            fields.nidn.as_deref(),
            fields.email.as_deref(),
            Some(&id),
        )
        .await?;

        repo.replace(&id, &fields)
            .await
            .map_err(|e| e.into_write_error(LECTURER_EXISTS))?
            .ok_or_else(|| AppError::not_found("lecturer not found"))
    }

    #[instrument(skip(repo))]
    pub async fn update(
        repo: &dyn LecturerRepository,
        id: &str,
        dto: PatchLecturerDto,
    ) -> AppResult<Lecturer> {
        let id = validation::lecturer_id(id)?;
        let patch = LecturerPatch {
            nidn: validation::optional_nidn(dto.nidn)?,
            nama_dosen: dto
                .nama_dosen
                .map(|name| validation::text("nama_dosen", &name, NAME_MIN, NAME_MAX))
                .transpose()?,
            email: validation::optional_email(dto.email)?,
            no_hp: validation::optional_lecturer_phone(dto.no_hp)?,
            jabatan_akademik: validation::optional_text(
                "jabatan_akademik",
                dto.jabatan_akademik,
                RANK_MAX,
            )?,
        };

        Self::ensure_unique(
            repo,
            patch.nidn.as_deref(),
            patch.email.as_deref(),
            Some(&id),
        )
        .await?;

        repo.update(&id, &patch)
            .await
            .map_err(|e| e.into_write_error(LECTURER_EXISTS))?
            .ok_or_else(|| AppError::not_found("lecturer not found"))
    }

    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn LecturerRepository, id: &str) -> AppResult<String> {
        let id = validation::lecturer_id(id)?;

        if repo.has_courses(&id).await? {
            return Err(AppError::conflict(
                "lecturer is still responsible for courses",
            ));
        }
        if repo.has_classes(&id).await? {
            return Err(AppError::conflict("lecturer still teaches classes"));
        }

        let deleted = repo
            .delete(&id)
            .await
            .map_err(|e| e.into_delete_error("lecturer is still referenced"))?;
        if !deleted {
            return Err(AppError::not_found("lecturer not found"));
        }

        info!(lecturer.id = %id, "lecturer deleted");
        Ok(id)
    }
}
