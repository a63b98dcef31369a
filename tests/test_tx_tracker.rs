//! Tracker sweep behavior against a real Postgres:
//! a pending transaction whose hash never appears on chain is failed once it
//! ages past the expiry window, and the proof status reflects that.
//!
//! Skips (with a message) when DATABASE_URL is not set. The Cardano client
//! points at a closed port, so every lookup errors and the sweep exercises
//! the skip-and-continue path.

use notechain::domain::model::TxStatus;
use notechain::{CardanoClient, DatabaseService, NoteTag, TxTracker};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pending_transactions_expire() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(db_url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping test_pending_transactions_expire: DATABASE_URL not set");
        return Ok(());
    };

    let db = Arc::new(DatabaseService::new_with_url(&db_url).await?);
    let chain = Arc::new(CardanoClient::new("http://127.0.0.1:9".to_string(), None));

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let username = format!("tracker_{}", nanos);
    let user_id = db
        .create_user(&username, &username, "$argon2id$placeholder", "")
        .await?;

    let tx_hash = format!("{:064x}", nanos);
    let note = db
        .create_note(
            user_id,
            "Tracked note",
            "content",
            NoteTag::NoTag,
            Some(&tx_hash),
        )
        .await?;
    assert_eq!(note.transaction_id.as_deref(), Some(tx_hash.as_str()));

    let recorded = db.transaction_status(&tx_hash).await?.unwrap();
    assert_eq!(recorded.status, TxStatus::Pending);
    assert_eq!(recorded.note_id, note.id);
    assert!(recorded.confirmed_at.is_none());

    // Expiry window of zero: anything recorded before "now" is stale.
    let tracker = TxTracker::with_settings(db.clone(), chain, Duration::from_secs(3600), 0);
    let summary = tracker.poll_once().await?;
    assert!(summary.checked >= 1);
    assert_eq!(summary.confirmed, 0);
    assert!(summary.expired >= 1);

    let expired = db.transaction_status(&tx_hash).await?.unwrap();
    assert_eq!(expired.status, TxStatus::Failed);

    // A failed hash is out of the pending set; the next sweep has nothing
    // left to check for it.
    let pending = db.pending_transactions(100).await?;
    assert!(pending.iter().all(|t| t.tx_hash != tx_hash));

    Ok(())
}
