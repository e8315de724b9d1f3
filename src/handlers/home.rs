use axum::response::Redirect;

/// The landing page is the users index.
pub async fn index() -> Redirect {
    Redirect::to("/users")
}
