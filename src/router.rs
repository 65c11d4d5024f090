use crate::docs::ApiDoc;
use crate::middleware::role::require_staff;
use crate::modules::auth::router::init_auth_router;
use crate::modules::faculties::router::init_faculties_router;
use crate::modules::lecturers::router::init_lecturers_router;
use crate::modules::programs::router::init_programs_router;
use crate::modules::students::router::init_students_router;
use crate::modules::terms::router::init_terms_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Json, Router, middleware, routing::get};
use registrar_observability::logging_middleware;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

async fn health() -> Json<Value> {
    Json(json!({ "message": "OK" }))
}

pub fn init_router(state: AppState) -> Router {
    let staff_only = || middleware::from_fn_with_state(state.clone(), require_staff);

    Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/", get(health))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/fakultas", init_faculties_router().route_layer(staff_only()))
                .nest("/prodi", init_programs_router().route_layer(staff_only()))
                .nest("/dosen", init_lecturers_router().route_layer(staff_only()))
                .nest("/mahasiswa", init_students_router().route_layer(staff_only()))
                .nest("/semester", init_terms_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
