mod common;

use axum::http::StatusCode;
use common::{admin_token, send, setup_test_app, token_for};
use registrar::testing::InMemoryStore;
use serde_json::json;

#[tokio::test]
async fn test_health_is_public() {
    let store = InMemoryStore::new();
    let app = setup_test_app(&store);

    let (status, body) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OK");
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let store = InMemoryStore::new();
    let app = setup_test_app(&store);

    for uri in ["/api/v1/fakultas", "/api/v1/mahasiswa", "/api/v1/semester"] {
        let (status, body) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "Missing authorization header");
    }

    let (status, body) = send(&app, "GET", "/api/v1/prodi", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid or expired token");
}

#[tokio::test]
async fn test_master_data_is_staff_only() {
    let store = InMemoryStore::new();
    let app = setup_test_app(&store);
    let lecturer = token_for("dosen", Some("0000000001"));
    let student = token_for("mahasiswa", Some("220101010001"));

    for uri in ["/api/v1/fakultas", "/api/v1/prodi", "/api/v1/dosen", "/api/v1/mahasiswa"] {
        for token in [&lecturer, &student] {
            let (status, _) = send(&app, "GET", uri, Some(token), None).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        }
        let (status, _) = send(&app, "GET", uri, Some(&token_for("operator", None)), None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_terms_are_readable_by_every_role() {
    let store = InMemoryStore::new();
    let app = setup_test_app(&store);
    let lecturer = token_for("dosen", Some("0000000001"));

    let (status, body) = send(&app, "GET", "/api/v1/semester", Some(&lecturer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["page"], 1);

    let term = json!({ "id_semester": "20241", "tahun_ajaran": "2024/2025", "term": "Ganjil" });
    let (status, _) = send(&app, "POST", "/api/v1/semester", Some(&lecturer), Some(term.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(store.write_count(), 0);

    let (status, _) = send(&app, "POST", "/api/v1/semester", Some(&admin_token()), Some(term)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_unknown_role_claim_is_forbidden() {
    let store = InMemoryStore::new();
    let app = setup_test_app(&store);

    let (status, body) = send(&app, "GET", "/api/v1/semester", Some(&token_for("guest", None)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied. Unknown role");
}
