use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_program, delete_program, get_program, list_programs, replace_program, update_program,
};

/// Routes: GET/POST /, GET/PUT/PATCH/DELETE /{id}
pub fn init_programs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_programs).post(create_program))
        .route(
            "/{id}",
            get(get_program)
                .put(replace_program)
                .patch(update_program)
                .delete(delete_program),
        )
}
