use crate::domain::model::{ChainTransaction, Note, NoteTag, PublicUser, TxStatus, WalletSession};
use crate::infra::cardano::{AddressBalance, TxInfo};
use crate::transport::http::handlers::{auth, health, notes, transactions, wallets};
use crate::transport::http::types::{
    ApiResponse, ConnectWalletRequest, CreateNoteRequest, DisconnectWalletRequest, LoginRequest,
    RegisterRequest, SubmitTransactionRequest, UpdateNoteRequest,
};
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::ping_handler,
        auth::register_handler,
        auth::login_handler,
        notes::list_notes_handler,
        notes::create_note_handler,
        notes::update_note_handler,
        notes::delete_note_handler,
        notes::note_proof_handler,
        wallets::connect_wallet_handler,
        wallets::disconnect_wallet_handler,
        wallets::wallet_balance_handler,
        transactions::get_transaction_handler,
        transactions::submit_transaction_handler
    ),
    components(schemas(
        ApiResponse,
        RegisterRequest,
        LoginRequest,
        CreateNoteRequest,
        UpdateNoteRequest,
        ConnectWalletRequest,
        DisconnectWalletRequest,
        SubmitTransactionRequest,
        Note,
        NoteTag,
        PublicUser,
        WalletSession,
        ChainTransaction,
        TxStatus,
        AddressBalance,
        TxInfo
    )),
    modifiers(&SecurityAddon)
)]
#[allow(dead_code)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/api/ping", get(health::ping_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route(
            "/api/notes",
            get(notes::list_notes_handler).post(notes::create_note_handler),
        )
        .route(
            "/api/notes/:id",
            put(notes::update_note_handler).delete(notes::delete_note_handler),
        )
        .route("/api/notes/:id/proof", get(notes::note_proof_handler))
        .route("/api/wallets/connect", post(wallets::connect_wallet_handler))
        .route(
            "/api/wallets/disconnect",
            post(wallets::disconnect_wallet_handler),
        )
        .route(
            "/api/wallets/:address/balance",
            get(wallets::wallet_balance_handler),
        )
        .route(
            "/api/transactions/:hash",
            get(transactions::get_transaction_handler),
        )
        .route(
            "/api/transactions/submit",
            post(transactions::submit_transaction_handler),
        )
        .with_state(app_state)
}
