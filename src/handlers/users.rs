use std::collections::HashMap;

use axum::extract::{Extension, Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::error::ApiError;
use crate::csrf;
use crate::flash::{self, FlashMessage};
use crate::forms::filter::UsersFilterData;
use crate::forms::user::UserForm;
use crate::trace::TraceId;
use crate::users::{query_factory, redirect, ui_error, validation};
use crate::views;
use crate::AppState;

/// CSRF intent shared by the create and edit forms.
const USER_FORM_INTENT: &str = "user_form";

/// GET /users: filtered, sorted, paginated listing. A failed backend call
/// degrades to an empty listing under a flashed error, answering 503 only
/// when the backend was unreachable.
pub async fn index(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
) -> Response {
    let filter = UsersFilterData::from_params(&params);
    let ctx = query_factory::from_request(&params, &filter);

    let (jar, secret) = csrf::ensure_secret(jar);
    let (jar, mut flashes) = flash::take(jar);

    match state.backend.list_users(&trace_id, &ctx.query).await {
        Ok(page) => {
            let html = views::users::index(&ctx, &filter, Some(&page), &flashes, &secret);
            (jar, Html(html)).into_response()
        }
        Err(error) => {
            flashes.push(FlashMessage::error(ui_error::flash_message(&error)));
            let status = ui_error::response_status(&error);
            let html = views::users::index(&ctx, &filter, None, &flashes, &secret);
            (status, jar, Html(html)).into_response()
        }
    }
}

/// GET /users/new
pub async fn new_form(jar: CookieJar) -> Response {
    let (jar, secret) = csrf::ensure_secret(jar);
    let (jar, flashes) = flash::take(jar);

    let html = views::users::new_form(
        &UserForm::default(),
        &flashes,
        &csrf::token(&secret, USER_FORM_INTENT),
    );

    (jar, Html(html)).into_response()
}

/// POST /users/new
pub async fn create(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    jar: CookieJar,
    Form(body): Form<HashMap<String, String>>,
) -> Response {
    if !csrf::is_valid(&jar, USER_FORM_INTENT, body.get("_token").map(String::as_str)) {
        return access_denied();
    }

    let mut form = UserForm::bind(&body);
    let mut status = StatusCode::OK;
    let mut failure = None;

    if form.validate() {
        if let Some(input) = form.to_input() {
            match state.backend.create_user(&trace_id, &input).await {
                Ok(_) => {
                    let jar = flash::push(jar, FlashMessage::success("User created"));
                    return (jar, Redirect::to("/users")).into_response();
                }
                Err(error) => {
                    if ui_error::is_validation_error(&error) {
                        validation::apply(&mut form, &error.details);
                    } else {
                        failure = Some(FlashMessage::error(ui_error::flash_message(&error)));
                        status = ui_error::response_status(&error);
                    }
                }
            }
        }
    }

    let (jar, secret) = csrf::ensure_secret(jar);
    let (jar, mut flashes) = flash::take(jar);
    if let Some(message) = failure {
        flashes.push(message);
    }

    let html = views::users::new_form(&form, &flashes, &csrf::token(&secret, USER_FORM_INTENT));
    (status, jar, Html(html)).into_response()
}

/// GET /users/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
) -> Response {
    let user = match state.backend.get_user(&trace_id, id).await {
        Ok(user) => user,
        Err(error) => {
            let redirect_params = redirect::from_request(&HashMap::new(), &params);
            return fetch_failure(&error, jar, &redirect_params);
        }
    };

    let form = UserForm::from_user(&user);
    let (jar, secret) = csrf::ensure_secret(jar);
    let (jar, flashes) = flash::take(jar);

    let html = views::users::edit_form(id, &form, &flashes, &csrf::token(&secret, USER_FORM_INTENT));
    (jar, Html(html)).into_response()
}

/// POST /users/{id}/edit
pub async fn update(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
    Form(body): Form<HashMap<String, String>>,
) -> Response {
    if !csrf::is_valid(&jar, USER_FORM_INTENT, body.get("_token").map(String::as_str)) {
        return access_denied();
    }

    // The record is re-fetched per request; a user deleted elsewhere turns
    // the edit into a 404 before any update is attempted.
    if let Err(error) = state.backend.get_user(&trace_id, id).await {
        let redirect_params = redirect::from_request(&body, &params);
        return fetch_failure(&error, jar, &redirect_params);
    }

    let mut form = UserForm::bind(&body);
    let mut status = StatusCode::OK;
    let mut failure = None;

    if form.validate() {
        if let Some(input) = form.to_input() {
            match state.backend.update_user(&trace_id, id, &input).await {
                Ok(_) => {
                    let jar = flash::push(jar, FlashMessage::success("User updated"));
                    return (jar, Redirect::to("/users")).into_response();
                }
                Err(error) => {
                    if ui_error::is_validation_error(&error) {
                        validation::apply(&mut form, &error.details);
                    } else if ui_error::is_not_found(&error) {
                        return not_found();
                    } else {
                        failure = Some(FlashMessage::error(ui_error::flash_message(&error)));
                        status = ui_error::response_status(&error);
                    }
                }
            }
        }
    }

    let (jar, secret) = csrf::ensure_secret(jar);
    let (jar, mut flashes) = flash::take(jar);
    if let Some(message) = failure {
        flashes.push(message);
    }

    let html = views::users::edit_form(id, &form, &flashes, &csrf::token(&secret, USER_FORM_INTENT));
    (status, jar, Html(html)).into_response()
}

/// POST /users/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
    Form(body): Form<HashMap<String, String>>,
) -> Response {
    let intent = format!("delete_user_{id}");
    if !csrf::is_valid(&jar, &intent, body.get("_token").map(String::as_str)) {
        return access_denied();
    }

    let redirect_params = redirect::from_request(&body, &params);

    let jar = match state.backend.delete_user(&trace_id, id).await {
        Ok(()) => flash::push(jar, FlashMessage::success("User deleted")),
        Err(error) => {
            let message = if ui_error::is_not_found(&error) {
                FlashMessage::error("User not found")
            } else {
                FlashMessage::error(ui_error::flash_message(&error))
            };

            if ui_error::is_transport_error(&error) {
                let (jar, mut flashes) = flash::take(jar);
                flashes.push(message);
                return render_index_fallback(
                    jar,
                    &redirect_params,
                    flashes,
                    StatusCode::SERVICE_UNAVAILABLE,
                );
            }

            flash::push(jar, message)
        }
    };

    (jar, Redirect::to(&redirect::index_url(&redirect_params))).into_response()
}

/// POST /users/import
pub async fn import(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
    Form(body): Form<HashMap<String, String>>,
) -> Response {
    if !csrf::is_valid(&jar, "import_users", body.get("_token").map(String::as_str)) {
        return access_denied();
    }

    let redirect_params = redirect::from_request(&body, &params);

    let jar = match state.backend.import_users(&trace_id).await {
        Ok(inserted) => flash::push(jar, FlashMessage::success(format!("Imported: {inserted}"))),
        Err(error) => {
            let message = FlashMessage::error(ui_error::flash_message(&error));

            if ui_error::is_transport_error(&error) {
                let (jar, mut flashes) = flash::take(jar);
                flashes.push(message);
                return render_index_fallback(
                    jar,
                    &redirect_params,
                    flashes,
                    StatusCode::SERVICE_UNAVAILABLE,
                );
            }

            flash::push(jar, message)
        }
    };

    (jar, Redirect::to(&redirect::index_url(&redirect_params))).into_response()
}

/// Shared branching for a failed record fetch: not-found becomes a 404 page,
/// a transport failure degrades to the empty listing at 503, anything else
/// flashes and bounces back to the index.
fn fetch_failure(error: &ApiError, jar: CookieJar, redirect_params: &[(String, String)]) -> Response {
    if ui_error::is_not_found(error) {
        return not_found();
    }

    let message = FlashMessage::error(ui_error::flash_message(error));

    if ui_error::is_transport_error(error) {
        let (jar, mut flashes) = flash::take(jar);
        flashes.push(message);
        return render_index_fallback(
            jar,
            redirect_params,
            flashes,
            StatusCode::SERVICE_UNAVAILABLE,
        );
    }

    let jar = flash::push(jar, message);
    (jar, Redirect::to("/users")).into_response()
}

/// Renders the users index without data, used when the backend is down but
/// the user still deserves a page instead of a bare error.
fn render_index_fallback(
    jar: CookieJar,
    params: &[(String, String)],
    flashes: Vec<FlashMessage>,
    status: StatusCode,
) -> Response {
    let map: HashMap<String, String> = params.iter().cloned().collect();
    let filter = UsersFilterData::from_params(&map);
    let ctx = query_factory::from_request(&map, &filter);

    let (jar, secret) = csrf::ensure_secret(jar);
    let html = views::users::index(&ctx, &filter, None, &flashes, &secret);

    (status, jar, Html(html)).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(views::users::not_found())).into_response()
}

fn access_denied() -> Response {
    (StatusCode::FORBIDDEN, Html(views::users::access_denied())).into_response()
}
