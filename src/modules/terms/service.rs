use chrono::NaiveDate;
use registrar_core::validation::{self, normalize_optional};
use registrar_core::{AppError, AppResult};
use registrar_models::{ListResponse, TermName};
use tracing::{info, instrument, warn};

use super::model::{
    CreateTermDto, DEFAULT_ORDER, NewTerm, PatchTermDto, ReplaceTermDto, SORT_COLUMNS, Term,
    TermFields, TermFilter, TermListParams, TermPatch,
};
use super::repository::TermRepository;

const TERM_EXISTS: &str = "term already exists";

/// Year and trailing digit encoded in a term id.
#[derive(Debug, Clone, Copy)]
struct TermKey {
    year: i32,
    digit: u8,
}

impl TermKey {
    fn parse(id: &str) -> AppResult<(String, Self)> {
        let id = validation::term_id(id)?;
        let (year, digit) = validation::term_id_parts(&id)?;
        Ok((id, Self { year, digit }))
    }

    /// The academic year label must start with the id's year.
    fn academic_year(&self, value: &str) -> AppResult<String> {
        let (label, first_year) = validation::academic_year(value)?;
        if first_year != self.year {
            return Err(AppError::invalid_input(format!(
                "tahun_ajaran must start with {}",
                self.year
            )));
        }
        Ok(label)
    }

    /// The term name must match the id's trailing digit.
    fn term(&self, value: &str) -> AppResult<TermName> {
        let term = TermName::parse_trimmed(value)?;
        let expected = TermName::from_digit(self.digit)
            .ok_or_else(|| AppError::invalid_input("id_semester must end in 1, 2 or 3"))?;
        if term != expected {
            return Err(AppError::invalid_input(format!(
                "term must be {expected} for a term id ending in {}",
                self.digit
            )));
        }
        Ok(term)
    }
}

fn ensure_date_order(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<()> {
    if let (Some(start), Some(end)) = (start, end)
        && start >= end
    {
        return Err(AppError::invalid_input(
            "tanggal_mulai must be before tanggal_selesai",
        ));
    }
    Ok(())
}

pub struct TermService;

impl TermService {
    fn fields(key: TermKey, dto: ReplaceTermDto) -> AppResult<TermFields> {
        let fields = TermFields {
            tahun_ajaran: key.academic_year(&dto.tahun_ajaran)?,
            term: key.term(&dto.term)?,
            tanggal_mulai: validation::optional_date("tanggal_mulai", dto.tanggal_mulai)?,
            tanggal_selesai: validation::optional_date("tanggal_selesai", dto.tanggal_selesai)?,
        };
        ensure_date_order(fields.tanggal_mulai, fields.tanggal_selesai)?;
        Ok(fields)
    }

    /// Runs every create check without writing. With `check_conflict` the
    /// id must also be unused.
    #[instrument(skip(repo))]
    pub async fn validate_for_create(
        repo: &dyn TermRepository,
        dto: CreateTermDto,
        check_conflict: bool,
    ) -> AppResult<NewTerm> {
        let (id, key) = TermKey::parse(&dto.id_semester)?;
        let fields = Self::fields(key, dto.into())?;

        if check_conflict && repo.exists_id(&id).await? {
            warn!(term.id = %id, "term id already exists");
            return Err(AppError::conflict(TERM_EXISTS));
        }

        Ok(NewTerm {
            id_semester: id,
            fields,
        })
    }

    #[instrument(skip(repo))]
    pub async fn list(
        repo: &dyn TermRepository,
        params: TermListParams,
    ) -> AppResult<ListResponse<Term>> {
        let page = params
            .pagination
            .page_request(params.sort.resolve(SORT_COLUMNS, DEFAULT_ORDER))?;
        page.validate()?;

        let filter = TermFilter {
            q: normalize_optional(params.q),
            tahun_ajaran: normalize_optional(params.tahun_ajaran)
                .map(|v| validation::academic_year(&v).map(|(label, _)| label))
                .transpose()?,
            term: normalize_optional(params.term)
                .map(|v| v.parse::<TermName>())
                .transpose()?,
        };

        let data = repo.list(&filter, &page).await?;
        Ok(ListResponse {
            data,
            meta: params.pagination.meta(),
        })
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn TermRepository, id: &str) -> AppResult<Term> {
        let id = validation::term_id(id)?;
        repo.get(&id)
            .await?
            .ok_or_else(|| AppError::not_found("term not found"))
    }

    #[instrument(skip(repo))]
    pub async fn create(repo: &dyn TermRepository, dto: CreateTermDto) -> AppResult<Term> {
        let new_term = Self::validate_for_create(repo, dto, true).await?;

        let term = repo
            .create(&new_term)
            .await
            .map_err(|e| e.into_write_error(TERM_EXISTS))?;

        info!(term.id = %term.id_semester, term.name = %term.term, "term created");
        Ok(term)
    }

    #[instrument(skip(repo))]
    pub async fn replace(
        repo: &dyn TermRepository,
        id: &str,
        dto: ReplaceTermDto,
    ) -> AppResult<Term> {
        let (id, key) = TermKey::parse(id)?;
        let fields = Self::fields(key, dto)?;

        if !repo.exists_id(&id).await? {
            return Err(AppError::not_found("term not found"));
        }

        repo.replace(&id, &fields)
            .await
            .map_err(|e| e.into_write_error(TERM_EXISTS))?
            .ok_or_else(|| AppError::not_found("term not found"))
    }

    /// Supplied values are checked against the id. Date order is checked
    /// on the result of merging the supplied dates over the stored ones.
    #[instrument(skip(repo))]
    pub async fn update(
        repo: &dyn TermRepository,
        id: &str,
        dto: PatchTermDto,
    ) -> AppResult<Term> {
        let (id, key) = TermKey::parse(id)?;
        let patch = TermPatch {
            tahun_ajaran: dto
                .tahun_ajaran
                .map(|v| key.academic_year(&v))
                .transpose()?,
            term: dto.term.map(|v| key.term(&v)).transpose()?,
            tanggal_mulai: validation::optional_date("tanggal_mulai", dto.tanggal_mulai)?,
            tanggal_selesai: validation::optional_date("tanggal_selesai", dto.tanggal_selesai)?,
        };
        ensure_date_order(patch.tanggal_mulai, patch.tanggal_selesai)?;

        let current = repo
            .get(&id)
            .await?
            .ok_or_else(|| AppError::not_found("term not found"))?;
        ensure_date_order(
            patch.tanggal_mulai.or(current.tanggal_mulai),
            patch.tanggal_selesai.or(current.tanggal_selesai),
        )?;

        repo.update(&id, &patch)
            .await
            .map_err(|e| e.into_write_error(TERM_EXISTS))?
            .ok_or_else(|| AppError::not_found("term not found"))
    }

    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn TermRepository, id: &str) -> AppResult<String> {
        let id = validation::term_id(id)?;

        if repo.get(&id).await?.is_none() {
            return Err(AppError::not_found("term not found"));
        }
        if repo.has_classes(&id).await? {
            return Err(AppError::conflict("term still has classes"));
        }
        if repo.has_registrations(&id).await? {
            return Err(AppError::conflict("term still has course registrations"));
        }

        let deleted = repo
            .delete(&id)
            .await
            .map_err(|e| e.into_delete_error("term is still referenced"))?;
        if !deleted {
            return Err(AppError::not_found("term not found"));
        }

        info!(term.id = %id, "term deleted");
        Ok(id)
    }
}
