use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_lecturer, delete_lecturer, get_lecturer, list_lecturers, replace_lecturer, update_lecturer,
};

/// Routes: GET/POST /, GET/PUT/PATCH/DELETE /{id}
pub fn init_lecturers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lecturers).post(create_lecturer))
        .route(
            "/{id}",
            get(get_lecturer)
                .put(replace_lecturer)
                .patch(update_lecturer)
                .delete(delete_lecturer),
        )
}
