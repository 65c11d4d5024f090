use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use registrar_core::{PaginationMeta, SortDirection};
use registrar_models::{
    Accreditation, DegreeLevel, Sex, StudentStatus, TermName, UserRole,
    faculties::{CreateFacultyDto, Faculty, PatchFacultyDto, ReplaceFacultyDto},
    lecturers::{CreateLecturerDto, Lecturer, PatchLecturerDto, ReplaceLecturerDto},
    programs::{CreateProgramDto, PatchProgramDto, Program, ReplaceProgramDto},
    students::{CreateStudentDto, PatchStudentDto, ReplaceStudentDto, Student},
    terms::{CreateTermDto, PatchTermDto, ReplaceTermDto, Term},
    users::{LoginRequest, LoginResponse, LoginUser, RegisterRequest, RegisterResponse, RegisteredUser},
};

use crate::modules::faculties::controller::DeletedFaculty;
use crate::modules::lecturers::controller::DeletedLecturer;
use crate::modules::programs::controller::DeletedProgram;
use crate::modules::students::controller::DeletedStudent;
use crate::modules::terms::controller::DeletedTerm;
use crate::modules::terms::import::{ImportReport, RowError};

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::faculties::controller::list_faculties,
        crate::modules::faculties::controller::get_faculty,
        crate::modules::faculties::controller::create_faculty,
        crate::modules::faculties::controller::replace_faculty,
        crate::modules::faculties::controller::update_faculty,
        crate::modules::faculties::controller::delete_faculty,
        crate::modules::programs::controller::list_programs,
        crate::modules::programs::controller::get_program,
        crate::modules::programs::controller::create_program,
        crate::modules::programs::controller::replace_program,
        crate::modules::programs::controller::update_program,
        crate::modules::programs::controller::delete_program,
        crate::modules::lecturers::controller::list_lecturers,
        crate::modules::lecturers::controller::get_lecturer,
        crate::modules::lecturers::controller::create_lecturer,
        crate::modules::lecturers::controller::replace_lecturer,
        crate::modules::lecturers::controller::update_lecturer,
        crate::modules::lecturers::controller::delete_lecturer,
        crate::modules::students::controller::list_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::replace_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::terms::controller::list_terms,
        crate::modules::terms::controller::get_term,
        crate::modules::terms::controller::create_term,
        crate::modules::terms::controller::replace_term,
        crate::modules::terms::controller::update_term,
        crate::modules::terms::controller::delete_term,
        crate::modules::terms::controller::import_terms,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            SortDirection,
            DegreeLevel,
            Accreditation,
            Sex,
            StudentStatus,
            TermName,
            UserRole,
            RegisterRequest,
            RegisterResponse,
            RegisteredUser,
            LoginRequest,
            LoginResponse,
            LoginUser,
            Faculty,
            CreateFacultyDto,
            ReplaceFacultyDto,
            PatchFacultyDto,
            DeletedFaculty,
            Program,
            CreateProgramDto,
            ReplaceProgramDto,
            PatchProgramDto,
            DeletedProgram,
            Lecturer,
            CreateLecturerDto,
            ReplaceLecturerDto,
            PatchLecturerDto,
            DeletedLecturer,
            Student,
            CreateStudentDto,
            ReplaceStudentDto,
            PatchStudentDto,
            DeletedStudent,
            Term,
            CreateTermDto,
            ReplaceTermDto,
            PatchTermDto,
            DeletedTerm,
            ImportReport,
            RowError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Credential registration and login"),
        (name = "Fakultas", description = "Faculty management"),
        (name = "Prodi", description = "Study program management"),
        (name = "Dosen", description = "Lecturer management"),
        (name = "Mahasiswa", description = "Student management"),
        (name = "Semester", description = "Academic terms and CSV import")
    ),
    info(
        title = "Registrar API",
        version = "0.1.0",
        description = "Academic records administration API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
