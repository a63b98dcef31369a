use crate::crypto::hashing::is_valid_tx_hash;
use crate::transport::http::handlers::common::{
    bad_gateway, bad_request, internal_error, json_422,
};
use crate::transport::http::types::{ApiResponse, AppState, SubmitTransactionRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/transactions/{hash}",
    params(
        ("hash" = String, Path, description = "Transaction hash (64 hex chars)")
    ),
    responses(
        (status = 200, description = "On-chain lookup plus local tracking state", body = ApiResponse),
        (status = 400, description = "Malformed transaction hash", body = ApiResponse),
        (status = 502, description = "Cardano API unreachable", body = ApiResponse)
    )
)]
pub async fn get_transaction_handler(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> impl IntoResponse {
    if !is_valid_tx_hash(&hash) {
        return bad_request("Transaction hash must be a 64-character hex string").into_response();
    }

    let on_chain = match state.cardano.transaction(&hash).await {
        Ok(info) => info,
        Err(e) => return bad_gateway(e).into_response(),
    };

    let tracking = match state.db_service.transaction_status(&hash).await {
        Ok(t) => t,
        Err(e) => return internal_error(e).into_response(),
    };

    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(serde_json::json!({
                "found": on_chain.is_some(),
                "transaction": on_chain,
                "tracking": tracking
            })),
            error: None,
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/transactions/submit",
    request_body = SubmitTransactionRequest,
    responses(
        (status = 200, description = "Transaction relayed; returns its hash", body = ApiResponse),
        (status = 400, description = "Missing or malformed cborHex", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 502, description = "Cardano API rejected the transaction", body = ApiResponse)
    )
)]
pub async fn submit_transaction_handler(
    State(state): State<AppState>,
    request: Result<Json<SubmitTransactionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"cborHex\"}").into_response(),
    };

    let cbor_hex = request.cbor_hex.trim();
    if cbor_hex.is_empty() {
        return bad_request("cborHex is required").into_response();
    }

    match state.cardano.submit_transaction(cbor_hex).await {
        Ok(tx_hash) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({ "txHash": tx_hash })),
                error: None,
            }),
        )
            .into_response(),
        Err(e) if e.to_string().contains("not valid hex") => {
            bad_request(&e.to_string()).into_response()
        }
        Err(e) => bad_gateway(e).into_response(),
    }
}
