//! Wallet-session and proof-of-existence flow against a real Postgres:
//! 1) Connect / reconnect / disconnect a wallet session.
//! 2) Create a note carrying a transaction hash and read its proof bundle.
//! 3) Ensure a recorded transaction hash cannot be replaced.
//!
//! Skips (with a message) when DATABASE_URL is not set. Chain lookups are
//! not exercised here (the tracker owns those); proof status stays pending.

use notechain::{transport, CardanoClient, DatabaseService};
use serde_json::json;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

async fn spawn_server(db_url: &str) -> Result<String, Box<dyn std::error::Error>> {
    let state = transport::http::AppState {
        db_service: Arc::new(DatabaseService::new_with_url(db_url).await?),
        cardano: Arc::new(CardanoClient::new("http://127.0.0.1:9".to_string(), None)),
        jwt_secret: Arc::new("integration-test-secret".to_string()),
        token_ttl_days: 7,
    };
    let router = transport::http::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(format!("http://{}", addr))
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_wallet_proof_flow() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(db_url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping test_wallet_proof_flow: DATABASE_URL not set");
        return Ok(());
    };

    let base_url = spawn_server(&db_url).await?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let suffix = unique_suffix();

    // --- Wallet sessions ---
    let wallet_address = format!("addr_test1q{}", suffix);
    let connect = client
        .post(format!("{}/api/wallets/connect", base_url))
        .json(&json!({ "walletType": "nami", "walletAddress": wallet_address }))
        .send()
        .await?;
    assert_eq!(connect.status(), 200);
    let connect = connect.json::<serde_json::Value>().await?;
    assert_eq!(connect["data"]["wallet"]["walletType"], "nami");

    // Reconnecting the same address swaps the wallet type instead of erroring.
    let reconnect = client
        .post(format!("{}/api/wallets/connect", base_url))
        .json(&json!({ "walletType": "eternl", "walletAddress": wallet_address }))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(reconnect["data"]["wallet"]["walletType"], "eternl");
    assert_eq!(
        reconnect["data"]["wallet"]["id"],
        connect["data"]["wallet"]["id"]
    );

    let missing_type = client
        .post(format!("{}/api/wallets/connect", base_url))
        .json(&json!({ "walletType": "", "walletAddress": "addr_test1qx" }))
        .send()
        .await?;
    assert_eq!(missing_type.status(), 400);

    let disconnect = client
        .post(format!("{}/api/wallets/disconnect", base_url))
        .json(&json!({ "walletAddress": wallet_address }))
        .send()
        .await?;
    assert_eq!(disconnect.status(), 200);

    let disconnect_again = client
        .post(format!("{}/api/wallets/disconnect", base_url))
        .json(&json!({ "walletAddress": wallet_address }))
        .send()
        .await?;
    assert_eq!(disconnect_again.status(), 404);

    // --- Proof-of-existence ---
    let username = format!("proof_flow_{}", suffix);
    client
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({ "name": "Proof Tester", "username": username, "password": "password123" }))
        .send()
        .await?;
    let login = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "username": username, "password": "password123" }))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let token = login["data"]["token"].as_str().unwrap().to_string();

    // Malformed hashes never reach storage.
    let malformed = client
        .post(format!("{}/api/notes", base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Bad hash",
            "content": "x",
            "transactionId": "zz-not-hex"
        }))
        .send()
        .await?;
    assert_eq!(malformed.status(), 400);

    let tx_hash = format!("{:064x}", suffix);
    let create = client
        .post(format!("{}/api/notes", base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "On-chain note",
            "content": "timestamped content",
            "tag": "Work",
            "transactionId": tx_hash
        }))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let note_id = create["data"]["note"]["id"].as_i64().unwrap();
    assert_eq!(create["data"]["note"]["transactionId"], tx_hash.as_str());

    let proof = client
        .get(format!("{}/api/notes/{}/proof", base_url, note_id))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(proof["data"]["transactionId"], tx_hash.as_str());
    assert_eq!(proof["data"]["status"], "pending");
    assert_eq!(proof["data"]["fingerprint"].as_str().unwrap().len(), 64);

    // The recorded hash is append-only: same hash is a no-op, a different
    // hash conflicts.
    let same_hash = client
        .put(format!("{}/api/notes/{}", base_url, note_id))
        .bearer_auth(&token)
        .json(&json!({
            "title": "On-chain note",
            "content": "timestamped content (edited)",
            "tag": "Work",
            "pinned": true,
            "transactionId": tx_hash
        }))
        .send()
        .await?;
    assert_eq!(same_hash.status(), 200);

    let replaced_hash = format!("{:064x}", suffix.wrapping_add(1));
    let replace = client
        .put(format!("{}/api/notes/{}", base_url, note_id))
        .bearer_auth(&token)
        .json(&json!({
            "title": "On-chain note",
            "content": "trying to repoint the proof",
            "tag": "Work",
            "pinned": true,
            "transactionId": replaced_hash
        }))
        .send()
        .await?;
    assert_eq!(replace.status(), 409);

    // A note without a hash reports not_recorded.
    let plain = client
        .post(format!("{}/api/notes", base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "Plain", "content": "no chain record" }))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let plain_id = plain["data"]["note"]["id"].as_i64().unwrap();
    let plain_proof = client
        .get(format!("{}/api/notes/{}/proof", base_url, plain_id))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(plain_proof["data"]["status"], "not_recorded");

    Ok(())
}
