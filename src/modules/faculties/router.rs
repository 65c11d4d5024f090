use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_faculty, delete_faculty, get_faculty, list_faculties, replace_faculty, update_faculty,
};

/// Routes: GET/POST /, GET/PUT/PATCH/DELETE /{id}
pub fn init_faculties_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_faculties).post(create_faculty))
        .route(
            "/{id}",
            get(get_faculty)
                .put(replace_faculty)
                .patch(update_faculty)
                .delete(delete_faculty),
        )
}
