//! Per-resource axum routers. Each module exposes a `router()` that the
//! application nests under `/api`.

pub mod calendar_apis;
pub mod family_apis;
pub mod mappers;
pub mod profile_apis;
pub mod rewards_apis;
pub mod settings_apis;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::errors::CalendarError;

/// Map a domain error to its HTTP response.
pub(crate) fn error_response(e: CalendarError) -> Response {
    let status = match &e {
        CalendarError::Validation(_) => StatusCode::BAD_REQUEST,
        CalendarError::NotFound(_) => StatusCode::NOT_FOUND,
        CalendarError::Persistence(_) | CalendarError::SourceUnavailable(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, e.to_string()).into_response()
}
