use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::AppState;

pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::users::index))
        .route(
            "/new",
            get(handlers::users::new_form).post(handlers::users::create),
        )
        .route(
            "/:id/edit",
            get(handlers::users::edit_form).post(handlers::users::update),
        )
        .route("/:id/delete", post(handlers::users::delete))
        .route("/import", post(handlers::users::import))
}
