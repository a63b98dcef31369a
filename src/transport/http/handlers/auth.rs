use crate::crypto::password::{hash_password, verify_password};
use crate::domain::auth::issue_token;
use crate::transport::http::handlers::common::{bad_request, internal_error, json_422};
use crate::transport::http::types::{ApiResponse, AppState, LoginRequest, RegisterRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse),
        (status = 400, description = "Missing fields", body = ApiResponse),
        (status = 409, description = "Username already taken", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn register_handler(
    State(state): State<AppState>,
    request: Result<Json<RegisterRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"name\", \"username\", \"password\", \"cardanoAddress\"?}")
                .into_response()
        }
    };

    let name = request.name.trim();
    let username = request.username.trim();
    if name.is_empty() || username.is_empty() || request.password.is_empty() {
        return bad_request("Missing fields").into_response();
    }

    match state.db_service.find_user_by_username(username).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse {
                    success: false,
                    data: None,
                    error: Some("Username exists".to_string()),
                }),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => return internal_error(e).into_response(),
    }

    let password_hash = match hash_password(&request.password) {
        Ok(h) => h,
        Err(e) => return internal_error(e).into_response(),
    };
    let cardano_address = request.cardano_address.as_deref().unwrap_or("");

    match state
        .db_service
        .create_user(name, username, &password_hash, cardano_address)
        .await
    {
        Ok(id) => (
            StatusCode::CREATED,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({ "id": id, "username": username })),
                error: None,
            }),
        )
            .into_response(),
        // A concurrent register for the same username loses on the unique
        // index rather than the pre-check above.
        Err(e) if e.to_string().contains("users_username_key") => (
            StatusCode::CONFLICT,
            Json(ApiResponse {
                success: false,
                data: None,
                error: Some("Username exists".to_string()),
            }),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; returns a bearer token", body = ApiResponse),
        (status = 400, description = "Missing fields", body = ApiResponse),
        (status = 401, description = "Invalid credentials", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"username\", \"password\"}").into_response(),
    };

    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return bad_request("Missing fields").into_response();
    }

    // Unknown user and wrong password answer identically.
    let invalid = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse {
                success: false,
                data: None,
                error: Some("Invalid credentials".to_string()),
            }),
        )
    };

    let user = match state.db_service.find_user_by_username(username).await {
        Ok(Some(u)) => u,
        Ok(None) => return invalid().into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    if !verify_password(&request.password, &user.password_hash) {
        return invalid().into_response();
    }

    let token = match issue_token(
        &state.jwt_secret,
        user.id,
        &user.username,
        &user.name,
        state.token_ttl_days,
    ) {
        Ok(t) => t,
        Err(e) => return internal_error(e).into_response(),
    };

    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(serde_json::json!({
                "token": token,
                "user": user.public()
            })),
            error: None,
        }),
    )
        .into_response()
}
