mod common;

use axum::http::StatusCode;
use common::{
    admin_token, seed_program, seed_program_chain, seed_student, send, setup_test_app, student_dto,
};
use registrar::modules::students::model::{
    CreateStudentDto, PatchStudentDto, ReplaceStudentDto, StudentListParams,
};
use registrar::modules::students::service::StudentService;
use registrar::testing::InMemoryStore;
use registrar_core::AppError;
use registrar_models::{Sex, StudentStatus};
use serde_json::json;

fn replace_dto(id_prodi: &str, status: Option<&str>) -> ReplaceStudentDto {
    ReplaceStudentDto {
        id_prodi: id_prodi.to_string(),
        nama_lengkap: "Budi Santoso".to_string(),
        jenis_kelamin: "L".to_string(),
        tahun_masuk: 2022,
        status: status.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_student_defaults_status() {
    let store = InMemoryStore::new();
    seed_program_chain(&store).await;

    let student = StudentService::create(
        &store,
        CreateStudentDto {
            nik: Some("3201012345678901".to_string()),
            tanggal_lahir: Some("2004-05-17".to_string()),
            no_hp: Some("0812-3456 789".to_string()),
            jenis_kelamin: " P ".to_string(),
            ..student_dto("220101010001", "PRD00001", "Siti Aminah")
        },
    )
    .await
    .unwrap();

    assert_eq!(student.status, StudentStatus::Active);
    assert_eq!(student.jenis_kelamin, Sex::Female);
    assert_eq!(student.angkatan, 2022);
    assert_eq!(student.tanggal_lahir.unwrap().to_string(), "2004-05-17");
}

#[tokio::test]
async fn test_create_student_requires_id() {
    let store = InMemoryStore::new();
    seed_program_chain(&store).await;

    let missing = StudentService::create(&store, student_dto(" ", "PRD00001", "Budi Santoso")).await;
    assert!(matches!(missing, Err(AppError::InvalidInput(m)) if m == "id_mahasiswa is required"));

    let malformed = StudentService::create(&store, student_dto("2201", "PRD00001", "Budi Santoso")).await;
    assert!(matches!(malformed, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_create_student_checks_in_order() {
    let store = InMemoryStore::new();
    seed_program_chain(&store).await;
    StudentService::create(
        &store,
        CreateStudentDto {
            email: Some("budi@mail.com".to_string()),
            nik: Some("3201012345678901".to_string()),
            ..student_dto("220101010001", "PRD00001", "Budi Santoso")
        },
    )
    .await
    .unwrap();

    let short_name = StudentService::create(&store, student_dto("220101010001", "PRD00001", "Al")).await;
    assert!(matches!(short_name, Err(AppError::InvalidInput(_))));

    let same_id = StudentService::create(&store, student_dto("220101010001", "PRD00001", "Andi Wijaya")).await;
    assert!(matches!(same_id, Err(AppError::Conflict(m)) if m == "id_mahasiswa already exists"));

    let both = StudentService::create(
        &store,
        CreateStudentDto {
            email: Some("budi@mail.com".to_string()),
            nik: Some("3201012345678901".to_string()),
            ..student_dto("220101010002", "PRD00001", "Andi Wijaya")
        },
    )
    .await;
    assert!(matches!(both, Err(AppError::Conflict(m)) if m == "email already exists"));

    let nik = StudentService::create(
        &store,
        CreateStudentDto {
            nik: Some("3201012345678901".to_string()),
            ..student_dto("220101010002", "PRD00001", "Andi Wijaya")
        },
    )
    .await;
    assert!(matches!(nik, Err(AppError::Conflict(m)) if m == "nik already exists"));

    let program = StudentService::create(&store, student_dto("220101010002", "PRD09999", "Andi Wijaya")).await;
    assert!(matches!(program, Err(AppError::Unprocessable(_))));
}

#[tokio::test]
async fn test_student_format_errors() {
    let store = InMemoryStore::new();
    seed_program_chain(&store).await;

    let cases = [
        student_dto("220101010001", "", "Budi Santoso"),
        CreateStudentDto {
            jenis_kelamin: "X".to_string(),
            ..student_dto("220101010001", "PRD00001", "Budi Santoso")
        },
        CreateStudentDto {
            nik: Some("12345".to_string()),
            ..student_dto("220101010001", "PRD00001", "Budi Santoso")
        },
        CreateStudentDto {
            tanggal_lahir: Some("17-05-2004".to_string()),
            ..student_dto("220101010001", "PRD00001", "Budi Santoso")
        },
        CreateStudentDto {
            tahun_masuk: 1999,
            ..student_dto("220101010001", "PRD00001", "Budi Santoso")
        },
        CreateStudentDto {
            status: Some("Wisuda".to_string()),
            ..student_dto("220101010001", "PRD00001", "Budi Santoso")
        },
        CreateStudentDto {
            no_hp: Some("0812/3456".to_string()),
            ..student_dto("220101010001", "PRD00001", "Budi Santoso")
        },
    ];
    for dto in cases {
        let result = StudentService::create(&store, dto.clone()).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))), "{dto:?}");
    }
}

#[tokio::test]
async fn test_replace_student_requires_status() {
    let store = InMemoryStore::new();
    seed_program_chain(&store).await;
    seed_student(&store, "220101010001", "PRD00001", "Budi Santoso").await;

    let missing = StudentService::replace(&store, "220101010001", replace_dto("PRD00001", None)).await;
    assert!(matches!(missing, Err(AppError::InvalidInput(m)) if m == "status is required"));

    let replaced =
        StudentService::replace(&store, "220101010001", replace_dto("PRD00001", Some("Cuti")))
            .await
            .unwrap();
    assert_eq!(replaced.status, StudentStatus::Leave);

    let unknown =
        StudentService::replace(&store, "220101019999", replace_dto("PRD00001", Some("Aktif"))).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_patch_student() {
    let store = InMemoryStore::new();
    let program = seed_program_chain(&store).await;
    seed_program(&store, "PRD00002", &program.id_fakultas, "Sistem Informasi", "SI").await;
    seed_student(&store, "220101010001", "PRD00001", "Budi Santoso").await;

    let updated = StudentService::update(
        &store,
        "220101010001",
        PatchStudentDto {
            id_prodi: Some("PRD00002".to_string()),
            tahun_masuk: Some(2023),
            status: Some("".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.id_prodi, "PRD00002");
    assert_eq!(updated.angkatan, 2023);
    assert_eq!(updated.status, StudentStatus::Active);

    let empty_ref = StudentService::update(
        &store,
        "220101010001",
        PatchStudentDto {
            id_prodi: Some("".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(empty_ref, Err(AppError::InvalidInput(m)) if m == "id_prodi cannot be empty"));

    let dangling = StudentService::update(
        &store,
        "220101010001",
        PatchStudentDto {
            id_prodi: Some("PRD09999".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(dangling, Err(AppError::Unprocessable(_))));
}

#[tokio::test]
async fn test_delete_student_with_registrations() {
    let store = InMemoryStore::new();
    seed_program_chain(&store).await;
    seed_student(&store, "220101010001", "PRD00001", "Budi Santoso").await;
    store.add_registration("220101010001", "20241");

    let blocked = StudentService::delete(&store, "220101010001").await;
    assert!(matches!(blocked, Err(AppError::Conflict(m)) if m == "student still has course registrations"));

    store.clear_dependents();
    assert_eq!(
        StudentService::delete(&store, "220101010001").await.unwrap(),
        "220101010001"
    );
}

#[tokio::test]
async fn test_list_students_filters() {
    let store = InMemoryStore::new();
    seed_program_chain(&store).await;
    seed_student(&store, "220101010001", "PRD00001", "Budi Santoso").await;
    StudentService::create(
        &store,
        CreateStudentDto {
            tahun_masuk: 2023,
            status: Some("Lulus".to_string()),
            ..student_dto("230101010001", "PRD00001", "Citra Lestari")
        },
    )
    .await
    .unwrap();

    let cohort = StudentService::list(
        &store,
        StudentListParams {
            angkatan: Some(2023),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(cohort.data.len(), 1);
    assert_eq!(cohort.data[0].nama_lengkap, "Citra Lestari");

    let active = StudentService::list(
        &store,
        StudentListParams {
            status: Some("Aktif".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(active.data.len(), 1);
    assert_eq!(active.data[0].id_mahasiswa, "220101010001");

    let bad_status = StudentService::list(
        &store,
        StudentListParams {
            status: Some("Unknown".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad_status, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_student_http_flow() {
    let store = InMemoryStore::new();
    seed_program_chain(&store).await;
    let app = setup_test_app(&store);
    let token = admin_token();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/mahasiswa",
        Some(&token),
        Some(json!({
            "id_mahasiswa": "220101010001",
            "id_prodi": "PRD00001",
            "nama_lengkap": "Budi Santoso",
            "jenis_kelamin": "L",
            "tanggal_lahir": "2004-05-17",
            "tahun_masuk": 2022
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Aktif");
    assert_eq!(body["data"]["tanggal_lahir"], "2004-05-17");
    assert!(body["data"].get("nik").is_none());

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/mahasiswa?angkatan=2022&sort_by=tahun_masuk",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["angkatan"], 2022);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/mahasiswa",
        Some(&token),
        Some(json!({ "id_mahasiswa": "220101010002", "tahun_masuk": "not a number" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
