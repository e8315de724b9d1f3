use axum::{middleware, routing::get, Router};

pub mod backend;
pub mod config;
pub mod csrf;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod trace;
pub mod users;
pub mod views;

use backend::BackendClient;

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub backend: BackendClient,
}

/// Create the main Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home::index))
        .nest("/users", routes::users::users_router())
        .merge(routes::health::health_router())
        .layer(middleware::from_fn(trace::propagate_trace_id))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
