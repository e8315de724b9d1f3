pub mod error;
pub mod query;

pub use error::{ApiError, ApiErrorCode};
pub use query::{ListQuery, SortDir};

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;

use crate::config::Settings;
use crate::models::{ListMeta, User, UserInput};
use crate::trace::{TraceId, TRACE_HEADER};

/// One page of users together with the pagination metadata it came with.
#[derive(Debug, Clone)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub meta: ListMeta,
}

/// HTTP client for the upstream users API. Built once at startup and shared
/// by every request handler; the transport timeout is the only bound on call
/// duration and there are no retries.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    import_token: Option<Secret<String>>,
}

impl BackendClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.backend_timeout_secs))
            .build()
            .context("Failed to build backend HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.backend_base_url.trim_end_matches('/').to_string(),
            import_token: settings.import_token.clone(),
        })
    }

    /// Lists users for the given query. Expects a `data` array and a `meta`
    /// object; any row that is not a decodable user aborts the whole call.
    pub async fn list_users(
        &self,
        trace_id: &TraceId,
        query: &ListQuery,
    ) -> Result<UsersPage, ApiError> {
        let request = self.request(Method::GET, "/users").query(&query.to_query());
        let payload = self.execute(trace_id, request, StatusCode::OK).await?;

        let rows = payload
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::invalid_response(StatusCode::OK.as_u16()))?;
        let meta = payload
            .get("meta")
            .filter(|value| value.is_object())
            .ok_or_else(|| ApiError::invalid_response(StatusCode::OK.as_u16()))?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(decode_user(row, StatusCode::OK)?);
        }

        Ok(UsersPage {
            users,
            meta: ListMeta::from_value(meta),
        })
    }

    pub async fn get_user(&self, trace_id: &TraceId, id: i64) -> Result<User, ApiError> {
        let request = self.request(Method::GET, &format!("/users/{id}"));
        let payload = self.execute(trace_id, request, StatusCode::OK).await?;

        decode_user(data_object(&payload, StatusCode::OK)?, StatusCode::OK)
    }

    pub async fn create_user(
        &self,
        trace_id: &TraceId,
        input: &UserInput,
    ) -> Result<User, ApiError> {
        let request = self.request(Method::POST, "/users").json(input);
        let payload = self.execute(trace_id, request, StatusCode::CREATED).await?;

        decode_user(data_object(&payload, StatusCode::CREATED)?, StatusCode::CREATED)
    }

    pub async fn update_user(
        &self,
        trace_id: &TraceId,
        id: i64,
        input: &UserInput,
    ) -> Result<User, ApiError> {
        let request = self
            .request(Method::PUT, &format!("/users/{id}"))
            .json(input);
        let payload = self.execute(trace_id, request, StatusCode::OK).await?;

        decode_user(data_object(&payload, StatusCode::OK)?, StatusCode::OK)
    }

    pub async fn delete_user(&self, trace_id: &TraceId, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/users/{id}"));
        self.execute(trace_id, request, StatusCode::NO_CONTENT)
            .await?;

        Ok(())
    }

    /// Triggers the backend import job, attaching the configured bearer token
    /// when one is set. Returns the number of inserted records.
    pub async fn import_users(&self, trace_id: &TraceId) -> Result<i64, ApiError> {
        let mut request = self.request(Method::POST, "/import");

        if let Some(token) = &self.import_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let payload = self.execute(trace_id, request, StatusCode::OK).await?;

        inserted_count(&payload)
            .ok_or_else(|| ApiError::invalid_response(StatusCode::OK.as_u16()))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        tracing::debug!("backend call: {} {}", method, path);
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Shared call core: attaches the trace header, sends the request and
    /// turns every failure mode into one [`ApiError`].
    async fn execute(
        &self,
        trace_id: &TraceId,
        request: reqwest::RequestBuilder,
        expected: StatusCode,
    ) -> Result<Value, ApiError> {
        let request = request.header(TRACE_HEADER, trace_id.as_str());

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!("backend request failed: {}", error);
                return Err(ApiError::transport());
            }
        };

        let status = response.status();

        if expected == StatusCode::NO_CONTENT && status == expected {
            return Ok(Value::Null);
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(error) => {
                tracing::error!("failed to read backend response body: {}", error);
                return Err(ApiError::transport());
            }
        };

        let payload: Value = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::error!("backend returned a non-JSON body: {}", error);
                return Err(ApiError::invalid_response(status.as_u16()));
            }
        };

        if status != expected {
            return Err(ApiError::from_response(status.as_u16(), &payload));
        }

        Ok(payload)
    }
}

fn data_object(payload: &Value, expected: StatusCode) -> Result<&Value, ApiError> {
    payload
        .get("data")
        .filter(|value| value.is_object())
        .ok_or_else(|| ApiError::invalid_response(expected.as_u16()))
}

fn decode_user(value: &Value, expected: StatusCode) -> Result<User, ApiError> {
    User::from_value(value).map_err(|error| {
        tracing::error!("backend user payload rejected: {}", error);
        ApiError::invalid_response(expected.as_u16())
    })
}

fn inserted_count(payload: &Value) -> Option<i64> {
    match payload.get("data")?.get("inserted")? {
        Value::Number(number) => number.as_i64(),
        Value::String(raw) if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) => {
            raw.parse().ok()
        }
        _ => None,
    }
}
