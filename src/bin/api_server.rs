// src/bin/api_server.rs

use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use notechain::infra::config;
use notechain::transport;
use notechain::CardanoClient;
use notechain::DatabaseService;
use notechain::TxTracker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // --- Service Initialization ---
    println!("> Initializing DatabaseService...");
    let db_service = Arc::new(DatabaseService::new().await?);
    println!("> DatabaseService initialized successfully.");

    println!("> Initializing Cardano API client...");
    let cardano = Arc::new(CardanoClient::from_env());

    // --- Tx Tracker Initialization ---
    let tx_tracker = Arc::new(TxTracker::new(db_service.clone(), cardano.clone()));
    tx_tracker.clone().start_background_poll_task();
    println!(
        "> TxTracker initialized. Background poll task started (every {}s, pending expiry {}s).",
        config::tx_poll_interval_secs(),
        config::tx_pending_expiry_secs()
    );

    let app_state = transport::http::AppState {
        db_service,
        cardano,
        jwt_secret: Arc::new(config::jwt_secret()),
        token_ttl_days: config::token_ttl_days(),
    };

    // --- API Server Initialization ---
    println!("> Starting API server...");
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    println!("> API server listening on http://{}", bind_addr);
    println!("> Swagger UI available at http://{}/swagger-ui", bind_addr);
    println!("> Press Ctrl+C to gracefully shutdown");

    // Setup graceful shutdown handler
    let tracker_for_shutdown = tx_tracker.clone();
    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n> Shutdown signal received (Ctrl+C)...");
            println!("> Running one final sweep over pending transactions...");
            if let Err(e) = tracker_for_shutdown.poll_once().await {
                eprintln!("> Error polling pending transactions during shutdown: {}", e);
            }
            tracker_for_shutdown.shutdown();
            println!("> Graceful shutdown complete.");
        }
    }

    Ok(())
}
