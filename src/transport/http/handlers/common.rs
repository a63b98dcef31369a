use crate::transport::http::types::ApiResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!("Invalid JSON body: {} (expected: {})", err, expected)),
        }),
    )
}

pub fn bad_request(message: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }),
    )
}

pub fn not_found(message: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }),
    )
}

pub fn internal_error(err: anyhow::Error) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(err.to_string()),
        }),
    )
}

/// Upstream (Cardano API) failures surface as 502 so clients can tell a
/// chain outage apart from a fault in this service.
pub fn bad_gateway(err: anyhow::Error) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::BAD_GATEWAY,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(err.to_string()),
        }),
    )
}
