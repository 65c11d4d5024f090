mod common;

use axum::http::StatusCode;
use common::{admin_token, seed_faculty, seed_program, send, setup_test_app};
use registrar::modules::faculties::model::{
    CreateFacultyDto, FacultyListParams, PatchFacultyDto, ReplaceFacultyDto,
};
use registrar::modules::faculties::service::FacultyService;
use registrar::modules::programs::service::ProgramService;
use registrar::testing::InMemoryStore;
use registrar_core::{AppError, PaginationParams, SortParams};
use serde_json::json;

#[tokio::test]
async fn test_create_faculty_generates_id() {
    let store = InMemoryStore::new();
    let faculty = FacultyService::create(
        &store,
        CreateFacultyDto {
            id_fakultas: None,
            nama_fakultas: "  Fakultas Ekonomi  ".to_string(),
            singkatan: Some(" FE ".to_string()),
        },
    )
    .await
    .unwrap();

    assert!(faculty.id_fakultas.starts_with("FAK"));
    assert_eq!(faculty.id_fakultas.len(), 8);
    assert_eq!(faculty.nama_fakultas, "Fakultas Ekonomi");
    assert_eq!(faculty.singkatan.as_deref(), Some("FE"));
}

#[tokio::test]
async fn test_create_faculty_rejects_duplicates() {
    let store = InMemoryStore::new();
    seed_faculty(&store, "FAK00001", "Fakultas Teknik").await;

    let same_id = FacultyService::create(
        &store,
        CreateFacultyDto {
            id_fakultas: Some("FAK00001".to_string()),
            nama_fakultas: "Fakultas Hukum".to_string(),
            singkatan: None,
        },
    )
    .await;
    assert!(matches!(same_id, Err(AppError::Conflict(m)) if m == "id_fakultas already exists"));

    let same_name = FacultyService::create(
        &store,
        CreateFacultyDto {
            id_fakultas: None,
            nama_fakultas: "fakultas TEKNIK".to_string(),
            singkatan: None,
        },
    )
    .await;
    assert!(matches!(same_name, Err(AppError::Conflict(m)) if m == "faculty name already exists"));
}

#[tokio::test]
async fn test_invalid_input_never_writes() {
    let store = InMemoryStore::new();
    let before = store.write_count();

    let short = FacultyService::create(
        &store,
        CreateFacultyDto {
            id_fakultas: None,
            nama_fakultas: "FT".to_string(),
            singkatan: None,
        },
    )
    .await;
    assert!(matches!(short, Err(AppError::InvalidInput(_))));

    let bad_id = FacultyService::create(
        &store,
        CreateFacultyDto {
            id_fakultas: Some("FAK-0001".to_string()),
            nama_fakultas: "Fakultas Teknik".to_string(),
            singkatan: None,
        },
    )
    .await;
    assert!(matches!(bad_id, Err(AppError::InvalidInput(_))));
    assert_eq!(store.write_count(), before);
}

#[tokio::test]
async fn test_concurrent_duplicate_maps_to_conflict() {
    let store = InMemoryStore::new();
    store.fail_next_write_with_unique_violation();

    let result = FacultyService::create(
        &store,
        CreateFacultyDto {
            id_fakultas: Some("FAK00009".to_string()),
            nama_fakultas: "Fakultas Pertanian".to_string(),
            singkatan: None,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_replace_and_patch_faculty() {
    let store = InMemoryStore::new();
    seed_faculty(&store, "FAK00001", "Fakultas Teknik").await;
    seed_faculty(&store, "FAK00002", "Fakultas Hukum").await;

    let replaced = FacultyService::replace(
        &store,
        "FAK00001",
        ReplaceFacultyDto {
            nama_fakultas: "Fakultas Teknik".to_string(),
            singkatan: Some("FT".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(replaced.singkatan.as_deref(), Some("FT"));

    let taken = FacultyService::update(
        &store,
        "FAK00001",
        PatchFacultyDto {
            nama_fakultas: Some("FAKULTAS HUKUM".to_string()),
            singkatan: None,
        },
    )
    .await;
    assert!(matches!(taken, Err(AppError::Conflict(_))));

    let missing = FacultyService::update(
        &store,
        "FAK09999",
        PatchFacultyDto {
            nama_fakultas: None,
            singkatan: Some("X".to_string()),
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_faculty_after_programs_are_removed() {
    let store = InMemoryStore::new();
    seed_faculty(&store, "FAK00001", "Fakultas Teknik").await;
    seed_program(&store, "PRD00001", "FAK00001", "Teknik Sipil", "TS").await;

    let result = FacultyService::delete(&store, "FAK00001").await;
    assert!(matches!(result, Err(AppError::Conflict(m)) if m == "faculty still has study programs"));
    assert!(FacultyService::get(&store, "FAK00001").await.is_ok());

    ProgramService::delete(&store, "PRD00001").await.unwrap();
    assert_eq!(FacultyService::delete(&store, "FAK00001").await.unwrap(), "FAK00001");
    let gone = FacultyService::get(&store, "FAK00001").await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));

    let missing = FacultyService::delete(&store, "FAK00002").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_list_faculties_filters_and_pages() {
    let store = InMemoryStore::new();
    seed_faculty(&store, "FAK00001", "Fakultas Teknik").await;
    seed_faculty(&store, "FAK00002", "Fakultas Hukum").await;
    seed_faculty(&store, "FAK00003", "Fakultas Ekonomi").await;

    let all = FacultyService::list(&store, FacultyListParams::default())
        .await
        .unwrap();
    let names: Vec<_> = all.data.iter().map(|f| f.nama_fakultas.as_str()).collect();
    assert_eq!(names, ["Fakultas Ekonomi", "Fakultas Hukum", "Fakultas Teknik"]);
    assert_eq!(all.meta.page, 1);
    assert_eq!(all.meta.per_page, 20);

    let filtered = FacultyService::list(
        &store,
        FacultyListParams {
            q: Some("hukum".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(filtered.data.len(), 1);

    let second_page = FacultyService::list(
        &store,
        FacultyListParams {
            pagination: PaginationParams {
                page: Some(2),
                per_page: Some(2),
            },
            sort: SortParams {
                sort_by: Some("nama_fakultas".to_string()),
                sort_dir: Some("desc".to_string()),
            },
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(second_page.data.len(), 1);
    assert_eq!(second_page.data[0].nama_fakultas, "Fakultas Ekonomi");

    let bad_page = FacultyService::list(
        &store,
        FacultyListParams {
            pagination: PaginationParams {
                page: Some(0),
                per_page: None,
            },
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad_page, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_faculty_http_flow() {
    let store = InMemoryStore::new();
    let app = setup_test_app(&store);
    let token = admin_token();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/fakultas",
        Some(&token),
        Some(json!({ "id_fakultas": "FAK00001", "nama_fakultas": "Fakultas Teknik" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "created");
    assert_eq!(body["data"]["id_fakultas"], "FAK00001");

    let (status, body) = send(&app, "GET", "/api/v1/fakultas?per_page=500", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["per_page"], 100);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/fakultas?page=9223372036854775807",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "page is out of range");

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/v1/fakultas/FAK00001",
        Some(&token),
        Some(json!({ "singkatan": "FT" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "updated");
    assert_eq!(body["data"]["singkatan"], "FT");

    let (status, body) = send(&app, "GET", "/api/v1/fakultas/bad", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("id_fakultas"));

    let (status, body) = send(&app, "DELETE", "/api/v1/fakultas/FAK00001", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "deleted", "data": { "id_fakultas": "FAK00001" } }));

    let (status, _) = send(&app, "GET", "/api/v1/fakultas/FAK00001", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_failure_is_opaque() {
    let store = InMemoryStore::new();
    let app = setup_test_app(&store);
    store.set_storage_failure(true);

    let (status, body) = send(&app, "GET", "/api/v1/fakultas", Some(&admin_token()), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal server error" }));
}
