use crate::transport::http::handlers::common::{
    bad_gateway, bad_request, internal_error, json_422, not_found,
};
use crate::transport::http::types::{
    ApiResponse, AppState, ConnectWalletRequest, DisconnectWalletRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/wallets/connect",
    request_body = ConnectWalletRequest,
    responses(
        (status = 200, description = "Wallet session stored", body = ApiResponse),
        (status = 400, description = "Missing fields", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn connect_wallet_handler(
    State(state): State<AppState>,
    request: Result<Json<ConnectWalletRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"walletType\", \"walletAddress\"}").into_response(),
    };

    let wallet_type = request.wallet_type.trim();
    let wallet_address = request.wallet_address.trim();
    if wallet_type.is_empty() || wallet_address.is_empty() {
        return bad_request("Wallet type and address are required").into_response();
    }

    match state
        .db_service
        .connect_wallet(wallet_type, wallet_address)
        .await
    {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({ "wallet": session })),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/wallets/disconnect",
    request_body = DisconnectWalletRequest,
    responses(
        (status = 200, description = "Wallet session removed", body = ApiResponse),
        (status = 400, description = "Missing fields", body = ApiResponse),
        (status = 404, description = "Unknown wallet address", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn disconnect_wallet_handler(
    State(state): State<AppState>,
    request: Result<Json<DisconnectWalletRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"walletAddress\"}").into_response(),
    };

    let wallet_address = request.wallet_address.trim();
    if wallet_address.is_empty() {
        return bad_request("Wallet address is required").into_response();
    }

    match state.db_service.disconnect_wallet(wallet_address).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({ "success": true })),
                error: None,
            }),
        )
            .into_response(),
        Ok(false) => not_found("Wallet session not found").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/wallets/{address}/balance",
    params(
        ("address" = String, Path, description = "Bech32 wallet address")
    ),
    responses(
        (status = 200, description = "Address balance", body = ApiResponse),
        (status = 502, description = "Cardano API unreachable or rejected the request", body = ApiResponse)
    )
)]
pub async fn wallet_balance_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    match state.cardano.address_balance(&address).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({ "balance": balance })),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => bad_gateway(e).into_response(),
    }
}
