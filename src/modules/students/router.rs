use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_student, delete_student, get_student, list_students, replace_student, update_student,
};

/// Routes: GET/POST /, GET/PUT/PATCH/DELETE /{id}
pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/{id}",
            get(get_student)
                .put(replace_student)
                .patch(update_student)
                .delete(delete_student),
        )
}
