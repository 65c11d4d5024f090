#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use registrar::modules::faculties::model::{CreateFacultyDto, Faculty};
use registrar::modules::faculties::service::FacultyService;
use registrar::modules::lecturers::model::{CreateLecturerDto, Lecturer};
use registrar::modules::lecturers::service::LecturerService;
use registrar::modules::programs::model::{CreateProgramDto, Program};
use registrar::modules::programs::service::ProgramService;
use registrar::modules::students::model::{CreateStudentDto, Student};
use registrar::modules::students::service::StudentService;
use registrar::modules::terms::model::{CreateTermDto, Term};
use registrar::modules::terms::service::TermService;
use registrar::router::init_router;
use registrar::testing::InMemoryStore;
use registrar_auth::create_access_token;
use serde_json::Value;
use tower::ServiceExt;

pub const BOUNDARY: &str = "registrar-test-boundary";

pub fn setup_test_app(store: &InMemoryStore) -> axum::Router {
    init_router(store.state())
}

/// Signs a token for `role` with the test secret, bypassing login.
pub fn token_for(role: &str, ref_id: Option<&str>) -> String {
    create_access_token(1, "tester", role, ref_id, &InMemoryStore::jwt_config()).unwrap()
}

pub fn admin_token() -> String {
    token_for("admin", None)
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, body)
}

/// Sends a JSON request and returns the status with the decoded body.
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

/// Uploads `csv` in the multipart field `field`.
pub async fn upload(
    app: &axum::Router,
    uri: &str,
    token: &str,
    field: &str,
    csv: &str,
) -> (StatusCode, Value) {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"semester.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {csv}\r\n\
         --{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

pub async fn seed_faculty(store: &InMemoryStore, id: &str, name: &str) -> Faculty {
    FacultyService::create(
        store,
        CreateFacultyDto {
            id_fakultas: Some(id.to_string()),
            nama_fakultas: name.to_string(),
            singkatan: None,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_program(
    store: &InMemoryStore,
    id: &str,
    id_fakultas: &str,
    name: &str,
    code: &str,
) -> Program {
    ProgramService::create(
        store,
        CreateProgramDto {
            id_prodi: Some(id.to_string()),
            id_fakultas: id_fakultas.to_string(),
            nama_prodi: name.to_string(),
            jenjang: "S1".to_string(),
            kode_prodi: code.to_string(),
            akreditasi: Some("Unggul".to_string()),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_lecturer(store: &InMemoryStore, id: &str, nidn: &str, email: &str) -> Lecturer {
    LecturerService::create(
        store,
        CreateLecturerDto {
            id_dosen: Some(id.to_string()),
            nidn: Some(nidn.to_string()),
            nama_dosen: "Dr. Sri Wahyuni".to_string(),
            email: Some(email.to_string()),
            no_hp: None,
            jabatan_akademik: Some("Lektor".to_string()),
        },
    )
    .await
    .unwrap()
}

pub fn student_dto(id: &str, id_prodi: &str, name: &str) -> CreateStudentDto {
    CreateStudentDto {
        id_mahasiswa: id.to_string(),
        id_prodi: id_prodi.to_string(),
        nama_lengkap: name.to_string(),
        jenis_kelamin: "L".to_string(),
        tahun_masuk: 2022,
        ..Default::default()
    }
}

pub async fn seed_student(store: &InMemoryStore, id: &str, id_prodi: &str, name: &str) -> Student {
    StudentService::create(store, student_dto(id, id_prodi, name))
        .await
        .unwrap()
}

pub fn term_dto(id: &str, year: &str, term: &str) -> CreateTermDto {
    CreateTermDto {
        id_semester: id.to_string(),
        tahun_ajaran: year.to_string(),
        term: term.to_string(),
        tanggal_mulai: None,
        tanggal_selesai: None,
    }
}

pub async fn seed_term(store: &InMemoryStore, id: &str, year: &str, term: &str) -> Term {
    TermService::create(store, term_dto(id, year, term)).await.unwrap()
}

/// A faculty with one program, the usual parent chain for students.
pub async fn seed_program_chain(store: &InMemoryStore) -> Program {
    seed_faculty(store, "FAK00001", "Fakultas Teknik").await;
    seed_program(store, "PRD00001", "FAK00001", "Teknik Informatika", "TIF").await
}
