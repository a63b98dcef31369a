use crate::app::database_service::DatabaseService;
use crate::domain::model::NoteTag;
use crate::infra::cardano::CardanoClient;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub db_service: Arc<DatabaseService>,
    pub cardano: Arc<CardanoClient>,
    pub jwt_secret: Arc<String>,
    pub token_ttl_days: i64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    /// Optional: users can register before ever connecting a wallet.
    #[serde(default)]
    pub cardano_address: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    /// Defaults to "No Tag" when omitted.
    #[serde(default)]
    pub tag: Option<NoteTag>,
    /// Hash of the wallet-submitted transaction timestamping this note.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
    pub pinned: bool,
    /// May attach a hash to a note that has none; an already-recorded hash
    /// cannot be replaced.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectWalletRequest {
    pub wallet_type: String,
    pub wallet_address: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectWalletRequest {
    pub wallet_address: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionRequest {
    /// Hex-encoded CBOR of a transaction already signed by the wallet.
    pub cbor_hex: String,
}
