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
    CreateStudentDto, PatchStudentDto, ReplaceStudentDto, Student, StudentListParams,
};
use super::service::StudentService;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedStudent {
    pub id_mahasiswa: String,
}

/// List students
#[utoipa::path(
    get,
    path = "/api/v1/mahasiswa",
    params(StudentListParams),
    responses(
        (status = 200, description = "Page of students", body = ListResponse<Student>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin or operator only")
    ),
    tag = "Mahasiswa",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_students(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<StudentListParams>,
) -> Result<Json<ListResponse<Student>>, AppError> {
    let students = StudentService::list(state.students.as_ref(), params).await?;
    Ok(Json(students))
}

/// Get a student
#[utoipa::path(
    get,
    path = "/api/v1/mahasiswa/{id}",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student", body = DataResponse<Student>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Student not found")
    ),
    tag = "Mahasiswa",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Student>>, AppError> {
    let student = StudentService::get(state.students.as_ref(), &id).await?;
    Ok(Json(DataResponse::new(student)))
}

/// Create a student
#[utoipa::path(
    post,
    path = "/api/v1/mahasiswa",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = MessageResponse<Student>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Duplicate id, nik or email"),
        (status = 422, description = "Study program does not exist")
    ),
    tag = "Mahasiswa",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    AppJson(dto): AppJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<MessageResponse<Student>>), AppError> {
    let student = StudentService::create(state.students.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::created(student))))
}

/// Replace a student
#[utoipa::path(
    put,
    path = "/api/v1/mahasiswa/{id}",
    params(("id" = String, Path, description = "Student id")),
    request_body = ReplaceStudentDto,
    responses(
        (status = 200, description = "Student updated", body = MessageResponse<Student>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Duplicate nik or email"),
        (status = 422, description = "Study program does not exist")
    ),
    tag = "Mahasiswa",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn replace_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<ReplaceStudentDto>,
) -> Result<Json<MessageResponse<Student>>, AppError> {
    let student = StudentService::replace(state.students.as_ref(), &id, dto).await?;
    Ok(Json(MessageResponse::updated(student)))
}

/// Update some fields of a student
#[utoipa::path(
    patch,
    path = "/api/v1/mahasiswa/{id}",
    params(("id" = String, Path, description = "Student id")),
    request_body = PatchStudentDto,
    responses(
        (status = 200, description = "Student updated", body = MessageResponse<Student>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Duplicate nik or email"),
        (status = 422, description = "Study program does not exist")
    ),
    tag = "Mahasiswa",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<PatchStudentDto>,
) -> Result<Json<MessageResponse<Student>>, AppError> {
    let student = StudentService::update(state.students.as_ref(), &id, dto).await?;
    Ok(Json(MessageResponse::updated(student)))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/api/v1/mahasiswa/{id}",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse<DeletedStudent>),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Student still has course registrations")
    ),
    tag = "Mahasiswa",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse<DeletedStudent>>, AppError> {
    let id_mahasiswa = StudentService::delete(state.students.as_ref(), &id).await?;
    Ok(Json(MessageResponse::deleted(DeletedStudent { id_mahasiswa })))
}
