pub mod listings;
pub mod reviews;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::warn;

use wayfare_core::WayfareError;

/// Map a domain error to an HTTP response. Validation failures carry a
/// field-level message; storage errors are logged and withheld.
pub fn error_response(err: WayfareError) -> Response {
    match err {
        WayfareError::Validation { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": { field: message } })),
        )
            .into_response(),
        WayfareError::DuplicateReview => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "error": "This reviewer has already reviewed this listing"
            })),
        )
            .into_response(),
        WayfareError::NotFound(what) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("Not found: {what}") })),
        )
            .into_response(),
        WayfareError::Forbidden(why) => (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": why })),
        )
            .into_response(),
        other => {
            warn!(error = %other, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
