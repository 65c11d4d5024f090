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
    CreateProgramDto, Program, ProgramListParams, PatchProgramDto, ReplaceProgramDto,
};
use super::service::ProgramService;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedProgram {
    pub id_prodi: String,
}

/// List study programs
#[utoipa::path(
    get,
    path = "/api/v1/prodi",
    params(ProgramListParams),
    responses(
        (status = 200, description = "Page of study programs", body = ListResponse<Program>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin or operator only")
    ),
    tag = "Prodi",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_programs(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ProgramListParams>,
) -> Result<Json<ListResponse<Program>>, AppError> {
    let programs = ProgramService::list(state.programs.as_ref(), params).await?;
    Ok(Json(programs))
}

/// Get a study program
#[utoipa::path(
    get,
    path = "/api/v1/prodi/{id}",
    params(("id" = String, Path, description = "Study program id")),
    responses(
        (status = 200, description = "Program", body = DataResponse<Program>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Study program not found")
    ),
    tag = "Prodi",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Program>>, AppError> {
    let program = ProgramService::get(state.programs.as_ref(), &id).await?;
    Ok(Json(DataResponse::new(program)))
}

/// Create a study program
#[utoipa::path(
    post,
    path = "/api/v1/prodi",
    request_body = CreateProgramDto,
    responses(
        (status = 201, description = "Program created", body = MessageResponse<Program>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Duplicate id, code or name"),
        (status = 422, description = "Faculty does not exist")
    ),
    tag = "Prodi",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_program(
    State(state): State<AppState>,
    AppJson(dto): AppJson<CreateProgramDto>,
) -> Result<(StatusCode, Json<MessageResponse<Program>>), AppError> {
    let program = ProgramService::create(state.programs.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::created(program))))
}

/// Replace a study program
#[utoipa::path(
    put,
    path = "/api/v1/prodi/{id}",
    params(("id" = String, Path, description = "Study program id")),
    request_body = ReplaceProgramDto,
    responses(
        (status = 200, description = "Program updated", body = MessageResponse<Program>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Study program not found"),
        (status = 409, description = "Duplicate code or name"),
        (status = 422, description = "Faculty does not exist")
    ),
    tag = "Prodi",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn replace_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<ReplaceProgramDto>,
) -> Result<Json<MessageResponse<Program>>, AppError> {
    let program = ProgramService::replace(state.programs.as_ref(), &id, dto).await?;
    Ok(Json(MessageResponse::updated(program)))
}

/// Update some fields of a study program
#[utoipa::path(
    patch,
    path = "/api/v1/prodi/{id}",
    params(("id" = String, Path, description = "Study program id")),
    request_body = PatchProgramDto,
    responses(
        (status = 200, description = "Program updated", body = MessageResponse<Program>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Study program not found"),
        (status = 409, description = "Duplicate code or name"),
        (status = 422, description = "Faculty does not exist")
    ),
    tag = "Prodi",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<PatchProgramDto>,
) -> Result<Json<MessageResponse<Program>>, AppError> {
    let program = ProgramService::update(state.programs.as_ref(), &id, dto).await?;
    Ok(Json(MessageResponse::updated(program)))
}

/// Delete a study program
#[utoipa::path(
    delete,
    path = "/api/v1/prodi/{id}",
    params(("id" = String, Path, description = "Study program id")),
    responses(
        (status = 200, description = "Program deleted", body = MessageResponse<DeletedProgram>),
        (status = 404, description = "Study program not found"),
        (status = 409, description = "Study program still has students or courses")
    ),
    tag = "Prodi",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse<DeletedProgram>>, AppError> {
    let id_prodi = ProgramService::delete(state.programs.as_ref(), &id).await?;
    Ok(Json(MessageResponse::deleted(DeletedProgram { id_prodi })))
}
