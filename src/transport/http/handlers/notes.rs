use crate::crypto::hashing::{is_valid_tx_hash, note_fingerprint};
use crate::transport::http::auth::AuthUser;
use crate::transport::http::handlers::common::{
    bad_request, internal_error, json_422, not_found,
};
use crate::transport::http::types::{
    ApiResponse, AppState, CreateNoteRequest, UpdateNoteRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/notes",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's notes, newest first", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_notes_handler(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> impl IntoResponse {
    match state.db_service.list_notes(claims.sub).await {
        Ok(notes) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({ "notes": notes })),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/notes",
    security(("bearer" = [])),
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = ApiResponse),
        (status = 400, description = "Missing fields or malformed transactionId", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_note_handler(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    request: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"title\", \"content\", \"tag\"?, \"transactionId\"?}")
                .into_response()
        }
    };

    let title = request.title.trim();
    if title.is_empty() || request.content.trim().is_empty() {
        return bad_request("Missing fields").into_response();
    }
    if let Some(tx) = request.transaction_id.as_deref() {
        if !is_valid_tx_hash(tx) {
            return bad_request("transactionId must be a 64-character hex transaction hash")
                .into_response();
        }
    }

    let tag = request.tag.unwrap_or_default();
    match state
        .db_service
        .create_note(
            claims.sub,
            title,
            &request.content,
            tag,
            request.transaction_id.as_deref(),
        )
        .await
    {
        Ok(note) => (
            StatusCode::CREATED,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({ "note": note })),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "Note id")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = ApiResponse),
        (status = 400, description = "Missing fields or malformed transactionId", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse),
        (status = 404, description = "No such note for this user", body = ApiResponse),
        (status = 409, description = "Note already has a recorded transaction", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_note_handler(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    request: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(
                e,
                "{\"title\", \"content\", \"tag\", \"pinned\", \"transactionId\"?}",
            )
            .into_response()
        }
    };

    let title = request.title.trim();
    if title.is_empty() || request.content.trim().is_empty() {
        return bad_request("Missing fields").into_response();
    }

    // The on-chain record is append-only evidence: a hash can be attached to
    // a note once, never swapped out afterwards.
    let mut attach_tx = None;
    if let Some(tx) = request.transaction_id.as_deref() {
        if !is_valid_tx_hash(tx) {
            return bad_request("transactionId must be a 64-character hex transaction hash")
                .into_response();
        }
        let existing = match state.db_service.get_note(claims.sub, id).await {
            Ok(Some(n)) => n,
            Ok(None) => return not_found("Note not found").into_response(),
            Err(e) => return internal_error(e).into_response(),
        };
        match existing.transaction_id.as_deref() {
            None => attach_tx = Some(tx.to_string()),
            Some(current) if current == tx => {}
            Some(_) => {
                return (
                    StatusCode::CONFLICT,
                    Json(ApiResponse {
                        success: false,
                        data: None,
                        error: Some("Note already has a recorded transaction".to_string()),
                    }),
                )
                    .into_response();
            }
        }
    }

    match state
        .db_service
        .update_note(
            claims.sub,
            id,
            title,
            &request.content,
            request.tag,
            request.pinned,
            attach_tx.as_deref(),
        )
        .await
    {
        Ok(Some(note)) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({ "note": note })),
                error: None,
            }),
        )
            .into_response(),
        Ok(None) => not_found("Note not found").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "Note id")
    ),
    responses(
        (status = 200, description = "Note deleted", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse),
        (status = 404, description = "No such note for this user", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_note_handler(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.db_service.delete_note(claims.sub, id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({ "success": true })),
                error: None,
            }),
        )
            .into_response(),
        Ok(false) => not_found("Note not found").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}/proof",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "Note id")
    ),
    responses(
        (status = 200, description = "Proof-of-existence bundle for the note", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse),
        (status = 404, description = "No such note for this user", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn note_proof_handler(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let note = match state.db_service.get_note(claims.sub, id).await {
        Ok(Some(n)) => n,
        Ok(None) => return not_found("Note not found").into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    let fingerprint = note_fingerprint(&note.title, &note.content, note.created_at);

    let tracking = match note.transaction_id.as_deref() {
        Some(tx_hash) => match state.db_service.transaction_status(tx_hash).await {
            Ok(t) => t,
            Err(e) => return internal_error(e).into_response(),
        },
        None => None,
    };

    let status = tracking
        .as_ref()
        .map(|t| t.status.as_str())
        .unwrap_or("not_recorded");

    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(serde_json::json!({
                "noteId": note.id,
                "fingerprint": fingerprint,
                "transactionId": note.transaction_id,
                "status": status,
                "tracking": tracking
            })),
            error: None,
        }),
    )
        .into_response()
}
