mod common;

use axum::http::StatusCode;
use common::{admin_token, seed_term, send, setup_test_app, term_dto, token_for, upload};
use registrar::modules::terms::import::{ImportReport, import_terms};
use registrar::modules::terms::model::{CreateTermDto, PatchTermDto, ReplaceTermDto, TermListParams};
use registrar::modules::terms::service::TermService;
use registrar::testing::InMemoryStore;
use registrar_core::AppError;
use registrar_models::TermName;
use serde_json::json;

const HEADER: &str = "id_semester,tahun_ajaran,term,tanggal_mulai,tanggal_selesai";

fn dated(id: &str, year: &str, term: &str, start: &str, end: &str) -> CreateTermDto {
    CreateTermDto {
        tanggal_mulai: Some(start.to_string()),
        tanggal_selesai: Some(end.to_string()),
        ..term_dto(id, year, term)
    }
}

#[tokio::test]
async fn test_create_term() {
    let store = InMemoryStore::new();
    let term = TermService::create(
        &store,
        dated(" 20241 ", "2024/2025", " Ganjil ", "2024-09-01", "2025-01-31"),
    )
    .await
    .unwrap();

    assert_eq!(term.id_semester, "20241");
    assert_eq!(term.term, TermName::Odd);
    assert_eq!(term.tanggal_mulai.unwrap().to_string(), "2024-09-01");

    let duplicate = TermService::create(&store, term_dto("20241", "2024/2025", "Ganjil")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(m)) if m == "term already exists"));
}

#[tokio::test]
async fn test_term_id_consistency() {
    let store = InMemoryStore::new();

    let year = TermService::create(&store, term_dto("20241", "2023/2024", "Ganjil")).await;
    assert!(matches!(year, Err(AppError::InvalidInput(m)) if m == "tahun_ajaran must start with 2024"));

    let name = TermService::create(&store, term_dto("20242", "2024/2025", "Ganjil")).await;
    assert!(matches!(name, Err(AppError::InvalidInput(m)) if m == "term must be Genap for a term id ending in 2"));

    for id in ["2024", "20244", "2024A", "202411", "१२३४1", "٢٠٢٤1"] {
        let result = TermService::create(&store, term_dto(id, "2024/2025", "Ganjil")).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))), "{id}");
    }

    let label = TermService::create(&store, term_dto("20241", "2024/2026", "Ganjil")).await;
    assert!(matches!(label, Err(AppError::InvalidInput(_))));

    let dates = TermService::create(
        &store,
        dated("20241", "2024/2025", "Ganjil", "2025-01-31", "2024-09-01"),
    )
    .await;
    assert!(matches!(dates, Err(AppError::InvalidInput(m)) if m == "tanggal_mulai must be before tanggal_selesai"));

    let unicode_get = TermService::get(&store, "٢٠٢٤1").await;
    assert!(matches!(unicode_get, Err(AppError::InvalidInput(_))));
    let unicode_patch = TermService::update(&store, "१२३४1", PatchTermDto::default()).await;
    assert!(matches!(unicode_patch, Err(AppError::InvalidInput(_))));

    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_import_reports_non_ascii_term_id() {
    let store = InMemoryStore::new();

    let csv = format!("{HEADER}\n१२३४1,2024/2025,Ganjil,,\n20241,2024/2025,Ganjil,,\n");
    let report = import_terms(&store, csv.as_bytes(), false).await.unwrap();

    match report {
        ImportReport::Commit {
            imported, errors, ..
        } => {
            assert_eq!(imported, 1);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].line, 2);
        }
        other => panic!("unexpected report: {other:?}"),
    }
}

#[tokio::test]
async fn test_replace_term() {
    let store = InMemoryStore::new();

    let invalid = TermService::replace(
        &store,
        "20241",
        ReplaceTermDto {
            tahun_ajaran: "2024/2025".to_string(),
            term: "Antara".to_string(),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(invalid, Err(AppError::InvalidInput(_))));

    let missing = TermService::replace(
        &store,
        "20241",
        ReplaceTermDto {
            tahun_ajaran: "2024/2025".to_string(),
            term: "Ganjil".to_string(),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound(m)) if m == "term not found"));

    TermService::create(
        &store,
        dated("20241", "2024/2025", "Ganjil", "2024-09-01", "2025-01-31"),
    )
    .await
    .unwrap();
    let replaced = TermService::replace(
        &store,
        "20241",
        ReplaceTermDto {
            tahun_ajaran: "2024/2025".to_string(),
            term: "Ganjil".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(replaced.tanggal_mulai, None);
    assert_eq!(replaced.tanggal_selesai, None);
}

#[tokio::test]
async fn test_patch_term_checks_merged_dates() {
    let store = InMemoryStore::new();
    TermService::create(
        &store,
        dated("20241", "2024/2025", "Ganjil", "2024-09-01", "2025-01-31"),
    )
    .await
    .unwrap();

    let past_end = TermService::update(
        &store,
        "20241",
        PatchTermDto {
            tanggal_mulai: Some("2025-02-01".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(past_end, Err(AppError::InvalidInput(_))));

    let moved = TermService::update(
        &store,
        "20241",
        PatchTermDto {
            tanggal_selesai: Some("2025-02-15".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.tanggal_mulai.unwrap().to_string(), "2024-09-01");
    assert_eq!(moved.tanggal_selesai.unwrap().to_string(), "2025-02-15");

    let wrong_name = TermService::update(
        &store,
        "20241",
        PatchTermDto {
            term: Some("Genap".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(wrong_name, Err(AppError::InvalidInput(_))));

    let missing = TermService::update(&store, "20251", PatchTermDto::default()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_term_gates() {
    let store = InMemoryStore::new();
    seed_term(&store, "20241", "2024/2025", "Ganjil").await;

    let missing = TermService::delete(&store, "20242").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    store.add_class("0000000001", "20241");
    store.add_registration("220101010001", "20241");
    let classes = TermService::delete(&store, "20241").await;
    assert!(matches!(classes, Err(AppError::Conflict(m)) if m == "term still has classes"));

    store.clear_dependents();
    store.add_registration("220101010001", "20241");
    let registrations = TermService::delete(&store, "20241").await;
    assert!(matches!(registrations, Err(AppError::Conflict(m)) if m == "term still has course registrations"));

    store.clear_dependents();
    assert_eq!(TermService::delete(&store, "20241").await.unwrap(), "20241");
}

#[tokio::test]
async fn test_list_terms_filters() {
    let store = InMemoryStore::new();
    seed_term(&store, "20241", "2024/2025", "Ganjil").await;
    seed_term(&store, "20242", "2024/2025", "Genap").await;
    seed_term(&store, "20251", "2025/2026", "Ganjil").await;

    let year = TermService::list(
        &store,
        TermListParams {
            tahun_ajaran: Some("2024/2025".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(year.data.len(), 2);

    let odd = TermService::list(
        &store,
        TermListParams {
            term: Some("Ganjil".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let ids: Vec<_> = odd.data.iter().map(|t| t.id_semester.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"20241") && ids.contains(&"20251"));

    let bad = TermService::list(
        &store,
        TermListParams {
            term: Some("Pendek".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_import_dry_run_writes_nothing() {
    let store = InMemoryStore::new();
    seed_term(&store, "20241", "2024/2025", "Ganjil").await;
    let writes = store.write_count();

    let csv = format!(
        "{HEADER}\n\
         20241,2024/2025,Ganjil,,\n\
         20242,2024/2025,Genap,2025-02-01,2025-06-30\n\
         20243,2024/2025,Ganjil,,\n\
         20251,2025/2026\n"
    );
    let report = import_terms(&store, csv.as_bytes(), true).await.unwrap();

    match report {
        ImportReport::DryRun {
            dry_run,
            total_rows,
            valid_rows,
            invalid_rows,
            errors,
        } => {
            assert!(dry_run);
            assert_eq!(total_rows, 4);
            assert_eq!(valid_rows, 1);
            assert_eq!(invalid_rows, 3);
            let lines: Vec<_> = errors.iter().map(|e| e.line).collect();
            assert_eq!(lines, vec![2, 4, 5]);
            assert_eq!(errors[0].error, "term already exists");
            assert_eq!(errors[2].error, "not enough columns");
        }
        other => panic!("unexpected report: {other:?}"),
    }
    assert_eq!(store.write_count(), writes);
}

#[tokio::test]
async fn test_import_commit_creates_valid_rows() {
    let store = InMemoryStore::new();

    let csv = format!(
        "{HEADER}\n\
         20241,2024/2025,Ganjil,2024-09-01,2025-01-31\n\
         20242,2024/2025,Genap,2025-06-30,2025-02-01\n\
         20243,2024/2025,Antara,,\n\
         20243,2024/2025,Antara,,\n"
    );
    let report = import_terms(&store, csv.as_bytes(), false).await.unwrap();

    match report {
        ImportReport::Commit {
            dry_run,
            imported,
            failed,
            errors,
        } => {
            assert!(!dry_run);
            assert_eq!(imported, 2);
            assert_eq!(failed, 2);
            assert_eq!(errors[0].line, 3);
            assert_eq!(errors[1].line, 5);
            assert_eq!(errors[1].error, "term already exists");
        }
        other => panic!("unexpected report: {other:?}"),
    }
    assert!(TermService::get(&store, "20243").await.is_ok());
    assert!(TermService::get(&store, "20242").await.is_err());
}

#[tokio::test]
async fn test_import_aborts_on_storage_failure() {
    let store = InMemoryStore::new();
    store.set_storage_failure(true);

    let csv = format!("{HEADER}\n20241,2024/2025,Ganjil,,\n");
    let result = import_terms(&store, csv.as_bytes(), true).await;
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn test_import_http() {
    let store = InMemoryStore::new();
    let app = setup_test_app(&store);
    let token = admin_token();
    let csv = format!("{HEADER}\n20241,2024/2025,Ganjil,,\n");

    let (status, body) = upload(&app, "/api/v1/semester/import", &token, "file", &csv).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dry_run"], true);
    assert_eq!(body["valid_rows"], 1);
    assert_eq!(store.write_count(), 0);

    let (status, body) = upload(
        &app,
        "/api/v1/semester/import?dry_run=false",
        &token,
        "file",
        &csv,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dry_run"], false);
    assert_eq!(body["imported"], 1);

    let (status, body) = upload(&app, "/api/v1/semester/import", &token, "upload", &csv).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing file field 'file'");

    let (status, body) = upload(
        &app,
        "/api/v1/semester/import",
        &token,
        "file",
        "semester,tahun\n20241,2024/2025\n",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("expected header"));

    let lecturer = token_for("dosen", Some("0000000001"));
    let (status, _) = upload(&app, "/api/v1/semester/import", &lecturer, "file", &csv).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_term_http_flow() {
    let store = InMemoryStore::new();
    let app = setup_test_app(&store);
    let token = admin_token();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/semester",
        Some(&token),
        Some(json!({
            "id_semester": "20241",
            "tahun_ajaran": "2024/2025",
            "term": "Ganjil",
            "tanggal_mulai": "2024-09-01",
            "tanggal_selesai": "2025-01-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["term"], "Ganjil");

    let student = token_for("mahasiswa", Some("220101010001"));
    let (status, body) = send(&app, "GET", "/api/v1/semester/20241", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tahun_ajaran"], "2024/2025");

    let (status, body) = send(
        &app,
        "DELETE",
        "/api/v1/semester/20241",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id_semester"], "20241");
}
