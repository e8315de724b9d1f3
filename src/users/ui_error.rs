use axum::http::StatusCode;

use crate::backend::error::{ApiError, ApiErrorCode};

/// True when the call never obtained a response from the backend.
pub fn is_transport_error(error: &ApiError) -> bool {
    error.code == ApiErrorCode::TransportError
}

pub fn is_not_found(error: &ApiError) -> bool {
    error.status == StatusCode::NOT_FOUND.as_u16() && error.code == ApiErrorCode::NotFound
}

pub fn is_validation_error(error: &ApiError) -> bool {
    error.status == StatusCode::UNPROCESSABLE_ENTITY.as_u16()
        && error.code == ApiErrorCode::ValidationError
}

/// The UI keeps answering 200 unless the backend was literally unreachable,
/// in which case the page degrades to 503.
pub fn response_status(error: &ApiError) -> StatusCode {
    if is_transport_error(error) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

pub fn flash_message(error: &ApiError) -> String {
    format!("{} ({})", error.message, error.code)
}
