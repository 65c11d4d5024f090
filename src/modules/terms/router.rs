use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_term, delete_term, get_term, import_terms, list_terms, replace_term, update_term,
};

/// Routes: GET/POST /, POST /import, GET/PUT/PATCH/DELETE /{id}
///
/// Roles are enforced per handler: reads admit every role, writes staff only.
pub fn init_terms_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_terms).post(create_term))
        .route("/import", post(import_terms))
        .route(
            "/{id}",
            get(get_term)
                .put(replace_term)
                .patch(update_term)
                .delete(delete_term),
        )
}
