use axum::{http::StatusCode, Json};
use serde::Serialize;
use timetable_core::TimetableError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// Rejection returned by the JSON handlers.
pub type ApiError = (StatusCode, Json<ErrorBody>);

/// Map an error to its HTTP status and JSON body. Bad request parameters
/// are 422, everything else is a server fault.
pub fn error_response(e: TimetableError) -> ApiError {
    let status = if e.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(ErrorBody {
            error: e.to_string(),
            code: e.code(),
        }),
    )
}
