mod common;

use axum::http::StatusCode;
use common::{admin_token, seed_lecturer, send, setup_test_app};
use registrar::modules::lecturers::model::{
    CreateLecturerDto, LecturerListParams, PatchLecturerDto, ReplaceLecturerDto,
};
use registrar::modules::lecturers::service::LecturerService;
use registrar::testing::InMemoryStore;
use registrar_core::AppError;
use serde_json::json;

fn lecturer(nidn: Option<&str>, email: Option<&str>) -> CreateLecturerDto {
    CreateLecturerDto {
        id_dosen: None,
        nidn: nidn.map(str::to_string),
        nama_dosen: "Ir. Bambang Sutrisno".to_string(),
        email: email.map(str::to_string),
        no_hp: Some("+6281234567".to_string()),
        jabatan_akademik: None,
    }
}

#[tokio::test]
async fn test_create_lecturer_generates_alphanumeric_id() {
    let store = InMemoryStore::new();
    let created = LecturerService::create(&store, lecturer(Some("0011223344"), None))
        .await
        .unwrap();

    assert_eq!(created.id_dosen.len(), 10);
    assert!(created.id_dosen.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(created.no_hp.as_deref(), Some("+6281234567"));
}

#[tokio::test]
async fn test_blank_optionals_are_absent() {
    let store = InMemoryStore::new();
    let created = LecturerService::create(
        &store,
        CreateLecturerDto {
            no_hp: Some("   ".to_string()),
            ..lecturer(Some(""), Some(" "))
        },
    )
    .await
    .unwrap();

    assert_eq!(created.nidn, None);
    assert_eq!(created.email, None);
    assert_eq!(created.no_hp, None);

    // Two lecturers without nidn or email never collide.
    assert!(LecturerService::create(&store, lecturer(None, None)).await.is_ok());
}

#[tokio::test]
async fn test_lecturer_uniqueness_order() {
    let store = InMemoryStore::new();
    seed_lecturer(&store, "DSN0000001", "0011223344", "sri@kampus.ac.id").await;

    let both = LecturerService::create(&store, lecturer(Some("0011223344"), Some("sri@kampus.ac.id"))).await;
    assert!(matches!(both, Err(AppError::Conflict(m)) if m == "nidn already exists"));

    let email = LecturerService::create(&store, lecturer(Some("9988776655"), Some("sri@kampus.ac.id"))).await;
    assert!(matches!(email, Err(AppError::Conflict(m)) if m == "email already exists"));

    let own = LecturerService::replace(
        &store,
        "DSN0000001",
        ReplaceLecturerDto {
            nidn: Some("0011223344".to_string()),
            nama_dosen: "Dr. Sri Wahyuni, M.Kom".to_string(),
            email: Some("sri@kampus.ac.id".to_string()),
            no_hp: None,
            jabatan_akademik: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(own.nama_dosen, "Dr. Sri Wahyuni, M.Kom");
    assert_eq!(own.jabatan_akademik, None);
}

#[tokio::test]
async fn test_lecturer_format_errors() {
    let store = InMemoryStore::new();
    let cases = [
        lecturer(Some("12ab"), None),
        lecturer(Some(&"1".repeat(17)), None),
        lecturer(None, Some("not-an-email")),
        CreateLecturerDto {
            no_hp: Some("0812-3456".to_string()),
            ..lecturer(None, None)
        },
        CreateLecturerDto {
            id_dosen: Some("SHORT".to_string()),
            ..lecturer(None, None)
        },
    ];
    for dto in cases {
        let result = LecturerService::create(&store, dto.clone()).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))), "{dto:?}");
    }
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_patch_lecturer_keeps_unsupplied_fields() {
    let store = InMemoryStore::new();
    seed_lecturer(&store, "DSN0000001", "0011223344", "sri@kampus.ac.id").await;

    let updated = LecturerService::update(
        &store,
        "DSN0000001",
        PatchLecturerDto {
            jabatan_akademik: Some("Lektor Kepala".to_string()),
            email: Some("".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.jabatan_akademik.as_deref(), Some("Lektor Kepala"));
    assert_eq!(updated.email.as_deref(), Some("sri@kampus.ac.id"));
    assert_eq!(updated.nidn.as_deref(), Some("0011223344"));
}

#[tokio::test]
async fn test_delete_lecturer_gates() {
    let store = InMemoryStore::new();
    seed_lecturer(&store, "DSN0000001", "0011223344", "sri@kampus.ac.id").await;
    seed_lecturer(&store, "DSN0000002", "0011223355", "andi@kampus.ac.id").await;
    store.add_course("PRD00001", Some("DSN0000001"));
    store.add_class("DSN0000002", "20241");

    let courses = LecturerService::delete(&store, "DSN0000001").await;
    assert!(matches!(courses, Err(AppError::Conflict(m)) if m.contains("courses")));

    let classes = LecturerService::delete(&store, "DSN0000002").await;
    assert!(matches!(classes, Err(AppError::Conflict(m)) if m == "lecturer still teaches classes"));

    store.clear_dependents();
    assert_eq!(LecturerService::delete(&store, "DSN0000001").await.unwrap(), "DSN0000001");
    assert_eq!(LecturerService::delete(&store, "DSN0000002").await.unwrap(), "DSN0000002");
    let gone = LecturerService::get(&store, "DSN0000002").await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_list_lecturers_search() {
    let store = InMemoryStore::new();
    seed_lecturer(&store, "DSN0000001", "0011223344", "sri@kampus.ac.id").await;
    LecturerService::create(&store, lecturer(Some("5566778899"), Some("bambang@kampus.ac.id")))
        .await
        .unwrap();

    let found = LecturerService::list(
        &store,
        LecturerListParams {
            q: Some("BAMBANG".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(found.data.len(), 1);
    assert_eq!(found.data[0].nidn.as_deref(), Some("5566778899"));
}

#[tokio::test]
async fn test_lecturer_http_put_not_found() {
    let store = InMemoryStore::new();
    let app = setup_test_app(&store);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/dosen/DSN0000404",
        Some(&admin_token()),
        Some(json!({ "nama_dosen": "Dr. Tidak Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "lecturer not found");
}
