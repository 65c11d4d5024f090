use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartRejection},
    http::StatusCode,
};
use registrar_core::AppError;
use registrar_models::{DataResponse, ListResponse, MessageResponse};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::role::{RequireAnyRole, RequireStaff};
use crate::state::AppState;
use crate::validator::{AppJson, ValidatedQuery};

use super::import::{self, ImportReport};
use super::model::{
    CreateTermDto, ImportParams, PatchTermDto, ReplaceTermDto, Term, TermListParams,
};
use super::service::TermService;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedTerm {
    pub id_semester: String,
}

/// List terms
#[utoipa::path(
    get,
    path = "/api/v1/semester",
    params(TermListParams),
    responses(
        (status = 200, description = "Page of terms", body = ListResponse<Term>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Semester",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth))]
pub async fn list_terms(
    State(state): State<AppState>,
    RequireAnyRole(_auth): RequireAnyRole,
    ValidatedQuery(params): ValidatedQuery<TermListParams>,
) -> Result<Json<ListResponse<Term>>, AppError> {
    let terms = TermService::list(state.terms.as_ref(), params).await?;
    Ok(Json(terms))
}

/// Get a term
#[utoipa::path(
    get,
    path = "/api/v1/semester/{id}",
    params(("id" = String, Path, description = "Term id, e.g. 20241")),
    responses(
        (status = 200, description = "Term", body = DataResponse<Term>),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Term not found")
    ),
    tag = "Semester",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth))]
pub async fn get_term(
    State(state): State<AppState>,
    RequireAnyRole(_auth): RequireAnyRole,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Term>>, AppError> {
    let term = TermService::get(state.terms.as_ref(), &id).await?;
    Ok(Json(DataResponse::new(term)))
}

/// Create a term
#[utoipa::path(
    post,
    path = "/api/v1/semester",
    request_body = CreateTermDto,
    responses(
        (status = 201, description = "Term created", body = MessageResponse<Term>),
        (status = 400, description = "Invalid input or inconsistent id, year and term"),
        (status = 403, description = "Forbidden - admin or operator only"),
        (status = 409, description = "Term already exists")
    ),
    tag = "Semester",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth))]
pub async fn create_term(
    State(state): State<AppState>,
    RequireStaff(_auth): RequireStaff,
    AppJson(dto): AppJson<CreateTermDto>,
) -> Result<(StatusCode, Json<MessageResponse<Term>>), AppError> {
    let term = TermService::create(state.terms.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::created(term))))
}

/// Replace a term
#[utoipa::path(
    put,
    path = "/api/v1/semester/{id}",
    params(("id" = String, Path, description = "Term id")),
    request_body = ReplaceTermDto,
    responses(
        (status = 200, description = "Term updated", body = MessageResponse<Term>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden - admin or operator only"),
        (status = 404, description = "Term not found")
    ),
    tag = "Semester",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth))]
pub async fn replace_term(
    State(state): State<AppState>,
    RequireStaff(_auth): RequireStaff,
    Path(id): Path<String>,
    AppJson(dto): AppJson<ReplaceTermDto>,
) -> Result<Json<MessageResponse<Term>>, AppError> {
    let term = TermService::replace(state.terms.as_ref(), &id, dto).await?;
    Ok(Json(MessageResponse::updated(term)))
}

/// Update some fields of a term
#[utoipa::path(
    patch,
    path = "/api/v1/semester/{id}",
    params(("id" = String, Path, description = "Term id")),
    request_body = PatchTermDto,
    responses(
        (status = 200, description = "Term updated", body = MessageResponse<Term>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden - admin or operator only"),
        (status = 404, description = "Term not found")
    ),
    tag = "Semester",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth))]
pub async fn update_term(
    State(state): State<AppState>,
    RequireStaff(_auth): RequireStaff,
    Path(id): Path<String>,
    AppJson(dto): AppJson<PatchTermDto>,
) -> Result<Json<MessageResponse<Term>>, AppError> {
    let term = TermService::update(state.terms.as_ref(), &id, dto).await?;
    Ok(Json(MessageResponse::updated(term)))
}

/// Delete a term
#[utoipa::path(
    delete,
    path = "/api/v1/semester/{id}",
    params(("id" = String, Path, description = "Term id")),
    responses(
        (status = 200, description = "Term deleted", body = MessageResponse<DeletedTerm>),
        (status = 403, description = "Forbidden - admin or operator only"),
        (status = 404, description = "Term not found"),
        (status = 409, description = "Term still has classes or course registrations")
    ),
    tag = "Semester",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth))]
pub async fn delete_term(
    State(state): State<AppState>,
    RequireStaff(_auth): RequireStaff,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse<DeletedTerm>>, AppError> {
    let id_semester = TermService::delete(state.terms.as_ref(), &id).await?;
    Ok(Json(MessageResponse::deleted(DeletedTerm { id_semester })))
}

/// Import terms from CSV
///
/// Multipart upload with a `file` field. Without `dry_run=false` nothing
/// is written.
#[utoipa::path(
    post,
    path = "/api/v1/semester/import",
    params(ImportParams),
    request_body(content_type = "multipart/form-data", description = "CSV file in field `file`"),
    responses(
        (status = 200, description = "Import report", body = ImportReport),
        (status = 400, description = "Missing file or invalid header"),
        (status = 403, description = "Forbidden - admin or operator only")
    ),
    tag = "Semester",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth, multipart))]
pub async fn import_terms(
    State(state): State<AppState>,
    RequireStaff(_auth): RequireStaff,
    Query(params): Query<ImportParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImportReport>, AppError> {
    let mut multipart =
        multipart.map_err(|_| AppError::invalid_input("missing file field 'file'"))?;

    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_input(format!("invalid multipart request: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|_| AppError::invalid_input("cannot open uploaded file"))?;
            data = Some(bytes);
            break;
        }
    }
    let data = data.ok_or_else(|| AppError::invalid_input("missing file field 'file'"))?;

    let report = import::import_terms(state.terms.as_ref(), &data, params.is_dry_run()).await?;
    Ok(Json(report))
}
