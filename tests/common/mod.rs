#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::Secret;
use serde_json::{json, Value};

use userdesk::config::Settings;

/// In-memory stand-in for the upstream users API, faithful to its JSON
/// contract: `data`/`meta` envelopes, 404/422 error payloads, bearer-guarded
/// import endpoint.
#[derive(Clone, Default)]
pub struct Stub {
    pub users: Arc<Mutex<BTreeMap<i64, Value>>>,
    pub next_id: Arc<Mutex<i64>>,
    pub traces: Arc<Mutex<Vec<String>>>,
    pub list_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub import_auth: Arc<Mutex<Vec<Option<String>>>>,
}

impl Stub {
    pub fn seed_user(&self, id: i64, first_name: &str, last_name: &str) {
        self.users.lock().unwrap().insert(
            id,
            json!({
                "id": id,
                "first_name": first_name,
                "last_name": last_name,
                "birthdate": "1990-05-15",
                "gender": "male",
                "inserted_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z",
            }),
        );
    }
}

pub fn stub_backend() -> (Router, Stub) {
    let stub = Stub::default();

    let router = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/import", post(import_users))
        .with_state(stub.clone());

    (router, stub)
}

/// Binds the router on an ephemeral local port and serves it in the
/// background for the rest of the test.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

pub fn settings(addr: SocketAddr) -> Settings {
    Settings {
        bind_address: "127.0.0.1:0".to_string(),
        backend_base_url: format!("http://{addr}"),
        backend_timeout_secs: 2,
        import_token: None,
    }
}

pub fn settings_with_token(addr: SocketAddr, token: &str) -> Settings {
    Settings {
        import_token: Some(Secret::new(token.to_string())),
        ..settings(addr)
    }
}

fn record_trace(stub: &Stub, headers: &HeaderMap) {
    if let Some(value) = headers.get("X-Trace-ID").and_then(|v| v.to_str().ok()) {
        stub.traces.lock().unwrap().push(value.to_string());
    }
}

fn not_found_envelope() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {"code": "not_found", "message": "User not found", "details": {}}
        })),
    )
        .into_response()
}

async fn list_users(
    State(stub): State<Stub>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    record_trace(&stub, &headers);
    stub.list_queries.lock().unwrap().push(params.clone());

    let users: Vec<Value> = stub.users.lock().unwrap().values().cloned().collect();
    let total = users.len();

    Json(json!({
        "data": users,
        "meta": {
            "page": params.get("page").and_then(|v| v.parse::<i64>().ok()).unwrap_or(1),
            "page_size": params.get("page_size").and_then(|v| v.parse::<i64>().ok()).unwrap_or(20),
            "total": total,
        }
    }))
}

async fn get_user(
    State(stub): State<Stub>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    record_trace(&stub, &headers);

    match stub.users.lock().unwrap().get(&id) {
        Some(user) => Json(json!({"data": user})).into_response(),
        None => not_found_envelope(),
    }
}

async fn create_user(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Response {
    record_trace(&stub, &headers);

    let first_name = input.get("first_name").and_then(Value::as_str).unwrap_or("");
    if first_name.is_empty() || first_name.starts_with("Invalid") {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": {
                    "code": "validation_error",
                    "message": "Validation failed",
                    "details": {"first_name": ["is not acceptable"]},
                }
            })),
        )
            .into_response();
    }

    let id = {
        let mut next_id = stub.next_id.lock().unwrap();
        *next_id += 1;
        *next_id
    };

    let mut record = input;
    record["id"] = json!(id);
    record["inserted_at"] = json!("2024-01-01T00:00:00Z");
    record["updated_at"] = json!("2024-01-01T00:00:00Z");

    stub.users.lock().unwrap().insert(id, record.clone());

    (StatusCode::CREATED, Json(json!({"data": record}))).into_response()
}

async fn update_user(
    State(stub): State<Stub>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Response {
    record_trace(&stub, &headers);

    let mut users = stub.users.lock().unwrap();
    let record = match users.get_mut(&id) {
        Some(record) => record,
        None => return not_found_envelope(),
    };

    for key in ["first_name", "last_name", "birthdate", "gender"] {
        if let Some(value) = input.get(key) {
            record[key] = value.clone();
        }
    }
    record["updated_at"] = json!("2024-01-02T00:00:00Z");

    Json(json!({"data": record.clone()})).into_response()
}

async fn delete_user(
    State(stub): State<Stub>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    record_trace(&stub, &headers);

    if stub.users.lock().unwrap().remove(&id).is_some() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found_envelope()
    }
}

async fn import_users(State(stub): State<Stub>, headers: HeaderMap) -> impl IntoResponse {
    record_trace(&stub, &headers);

    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    stub.import_auth.lock().unwrap().push(auth);

    Json(json!({"data": {"inserted": 5}}))
}
