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
    CreateLecturerDto, Lecturer, LecturerListParams, PatchLecturerDto, ReplaceLecturerDto,
};
use super::service::LecturerService;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedLecturer {
    pub id_dosen: String,
}

/// List lecturers
#[utoipa::path(
    get,
    path = "/api/v1/dosen",
    params(LecturerListParams),
    responses(
        (status = 200, description = "Page of lecturers", body = ListResponse<Lecturer>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin or operator only")
    ),
    tag = "Dosen",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_lecturers(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<LecturerListParams>,
) -> Result<Json<ListResponse<Lecturer>>, AppError> {
    let lecturers = LecturerService::list(state.lecturers.as_ref(), params).await?;
    Ok(Json(lecturers))
}

/// Get a lecturer
#[utoipa::path(
    get,
    path = "/api/v1/dosen/{id}",
    params(("id" = String, Path, description = "Lecturer id")),
    responses(
        (status = 200, description = "Lecturer", body = DataResponse<Lecturer>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Lecturer not found")
    ),
    tag = "Dosen",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_lecturer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Lecturer>>, AppError> {
    let lecturer = LecturerService::get(state.lecturers.as_ref(), &id).await?;
    Ok(Json(DataResponse::new(lecturer)))
}

/// Create a lecturer
#[utoipa::path(
    post,
    path = "/api/v1/dosen",
    request_body = CreateLecturerDto,
    responses(
        (status = 201, description = "Lecturer created", body = MessageResponse<Lecturer>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Duplicate id, NIDN or email")
    ),
    tag = "Dosen",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_lecturer(
    State(state): State<AppState>,
    AppJson(dto): AppJson<CreateLecturerDto>,
) -> Result<(StatusCode, Json<MessageResponse<Lecturer>>), AppError> {
    let lecturer = LecturerService::create(state.lecturers.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::created(lecturer))))
}

/// Replace a lecturer
#[utoipa::path(
    put,
    path = "/api/v1/dosen/{id}",
    params(("id" = String, Path, description = "Lecturer id")),
    request_body = ReplaceLecturerDto,
    responses(
        (status = 200, description = "Lecturer updated", body = MessageResponse<Lecturer>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Lecturer not found"),
        (status = 409, description = "Duplicate NIDN or email")
    ),
    tag = "Dosen",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn replace_lecturer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<ReplaceLecturerDto>,
) -> Result<Json<MessageResponse<Lecturer>>, AppError> {
    let lecturer = LecturerService::replace(state.lecturers.as_ref(), &id, dto).await?;
    Ok(Json(MessageResponse::updated(lecturer)))
}

/// Update some fields of a lecturer
#[utoipa::path(
    patch,
    path = "/api/v1/dosen/{id}",
    params(("id" = String, Path, description = "Lecturer id")),
    request_body = PatchLecturerDto,
    responses(
        (status = 200, description = "Lecturer updated", body = MessageResponse<Lecturer>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Lecturer not found"),
        (status = 409, description = "Duplicate NIDN or email")
    ),
    tag = "Dosen",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_lecturer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<PatchLecturerDto>,
) -> Result<Json<MessageResponse<Lecturer>>, AppError> {
    let lecturer = LecturerService::update(state.lecturers.as_ref(), &id, dto).await?;
    Ok(Json(MessageResponse::updated(lecturer)))
}

/// Delete a lecturer
#[utoipa::path(
    delete,
    path = "/api/v1/dosen/{id}",
    params(("id" = String, Path, description = "Lecturer id")),
    responses(
        (status = 200, description = "Lecturer deleted", body = MessageResponse<DeletedLecturer>),
        (status = 404, description = "Lecturer not found"),
        (status = 409, description = "Lecturer still has courses or classes")
    ),
    tag = "Dosen",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_lecturer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse<DeletedLecturer>>, AppError> {
    let id_dosen = LecturerService::delete(state.lecturers.as_ref(), &id).await?;
    Ok(Json(MessageResponse::deleted(DeletedLecturer { id_dosen })))
}
