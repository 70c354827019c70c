pub mod data;
pub mod error;
pub mod health;
pub mod params;
pub mod stats;
pub mod ui;

use axum::{
    body::Bytes,
    http::header,
    response::{IntoResponse, Response},
};

/// Wrap an already-serialized JSON payload in a response.
pub(crate) fn json_body(body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
