use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// Header carrying the correlation token between the browser, this app and
/// the backend service.
pub const TRACE_HEADER: &str = "X-Trace-ID";

/// Correlation token for one inbound request. Handlers pass it explicitly to
/// every backend call instead of the client digging it out of ambient
/// request state.
#[derive(Debug, Clone)]
pub struct TraceId(String);

impl TraceId {
    pub fn generate() -> Self {
        Self(format!("trace-{}", Uuid::new_v4()))
    }

    pub fn from_value(value: &str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::generate()
    }
}

/// Reads the inbound `X-Trace-ID` header (or generates a fresh id), stores it
/// in request extensions and echoes it on the response.
pub async fn propagate_trace_id(mut request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(TraceId::from_value)
        .unwrap_or_else(TraceId::generate);

    tracing::debug!("handling request with trace id {}", trace_id.as_str());

    request.extensions_mut().insert(trace_id.clone());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
        response.headers_mut().insert(TRACE_HEADER, value);
    }

    response
}
