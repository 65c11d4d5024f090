use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use registrar_core::AppError;
use registrar_models::{DataResponse, ListResponse, MessageResponse};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::state::AppState;
use crate::validator::{AppJson, ValidatedQuery};

use super::model::{
    CreateFacultyDto, Faculty, FacultyListParams, PatchFacultyDto, ReplaceFacultyDto,
};
use super::service::FacultyService;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedFaculty {
    pub id_fakultas: String,
}

/// List faculties
#[utoipa::path(
    get,
    path = "/api/v1/fakultas",
    params(FacultyListParams),
    responses(
        (status = 200, description = "Page of faculties", body = ListResponse<Faculty>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin or operator only")
    ),
    tag = "Fakultas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_faculties(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<FacultyListParams>,
) -> Result<Json<ListResponse<Faculty>>, AppError> {
    let faculties = FacultyService::list(state.faculties.as_ref(), params).await?;
    Ok(Json(faculties))
}

/// Get a faculty
#[utoipa::path(
    get,
    path = "/api/v1/fakultas/{id}",
    params(("id" = String, Path, description = "Faculty id")),
    responses(
        (status = 200, description = "Faculty", body = DataResponse<Faculty>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Faculty not found")
    ),
    tag = "Fakultas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Faculty>>, AppError> {
    let faculty = FacultyService::get(state.faculties.as_ref(), &id).await?;
    Ok(Json(DataResponse::new(faculty)))
}

/// Create a faculty
#[utoipa::path(
    post,
    path = "/api/v1/fakultas",
    request_body = CreateFacultyDto,
    responses(
        (status = 201, description = "Faculty created", body = MessageResponse<Faculty>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Duplicate id or name")
    ),
    tag = "Fakultas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_faculty(
    State(state): State<AppState>,
    AppJson(dto): AppJson<CreateFacultyDto>,
) -> Result<(StatusCode, Json<MessageResponse<Faculty>>), AppError> {
    let faculty = FacultyService::create(state.faculties.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::created(faculty))))
}

/// Replace a faculty
#[utoipa::path(
    put,
    path = "/api/v1/fakultas/{id}",
    params(("id" = String, Path, description = "Faculty id")),
    request_body = ReplaceFacultyDto,
    responses(
        (status = 200, description = "Faculty updated", body = MessageResponse<Faculty>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Faculty not found"),
        (status = 409, description = "Duplicate name")
    ),
    tag = "Fakultas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn replace_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<ReplaceFacultyDto>,
) -> Result<Json<MessageResponse<Faculty>>, AppError> {
    let faculty = FacultyService::replace(state.faculties.as_ref(), &id, dto).await?;
    Ok(Json(MessageResponse::updated(faculty)))
}

/// Update some fields of a faculty
#[utoipa::path(
    patch,
    path = "/api/v1/fakultas/{id}",
    params(("id" = String, Path, description = "Faculty id")),
    request_body = PatchFacultyDto,
    responses(
        (status = 200, description = "Faculty updated", body = MessageResponse<Faculty>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Faculty not found"),
        (status = 409, description = "Duplicate name")
    ),
    tag = "Fakultas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<PatchFacultyDto>,
) -> Result<Json<MessageResponse<Faculty>>, AppError> {
    let faculty = FacultyService::update(state.faculties.as_ref(), &id, dto).await?;
    Ok(Json(MessageResponse::updated(faculty)))
}

/// Delete a faculty
#[utoipa::path(
    delete,
    path = "/api/v1/fakultas/{id}",
    params(("id" = String, Path, description = "Faculty id")),
    responses(
        (status = 200, description = "Faculty deleted", body = MessageResponse<DeletedFaculty>),
        (status = 404, description = "Faculty not found"),
        (status = 409, description = "Faculty still has study programs")
    ),
    tag = "Fakultas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse<DeletedFaculty>>, AppError> {
    let id_fakultas = FacultyService::delete(state.faculties.as_ref(), &id).await?;
    Ok(Json(MessageResponse::deleted(DeletedFaculty { id_fakultas })))
}
