//! Tracks pending proof-of-existence transactions to completion.
//!
//! A note's transaction hash is produced by the user's wallet and submitted
//! from the browser, so the server only learns the hash, not the outcome.
//! The tracker polls the Cardano API periodically (configurable via
//! TX_POLL_INTERVAL_SECS) and promotes each pending hash to `completed` once
//! it is visible on chain, or to `failed` once it exceeds the expiry window
//! without appearing (TX_PENDING_EXPIRY_SECS).

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::{interval, Duration};

use crate::app::database_service::DatabaseService;
use crate::domain::model::TxStatus;
use crate::infra::cardano::CardanoClient;
use crate::infra::config;

/// Outcome of one poll sweep.
#[derive(Debug, Default, Clone, Copy)]
pub struct PollSummary {
    pub checked: usize,
    pub confirmed: usize,
    pub expired: u64,
}

pub struct TxTracker {
    db: Arc<DatabaseService>,
    chain: Arc<CardanoClient>,
    poll_interval: Duration,
    pending_expiry_secs: i64,
    /// Flag to control the background poll task.
    shutdown: Arc<Notify>,
}

impl TxTracker {
    /// Builds a tracker with intervals taken from the environment.
    pub fn new(db: Arc<DatabaseService>, chain: Arc<CardanoClient>) -> Self {
        Self::with_settings(
            db,
            chain,
            Duration::from_secs(config::tx_poll_interval_secs()),
            config::tx_pending_expiry_secs(),
        )
    }

    pub fn with_settings(
        db: Arc<DatabaseService>,
        chain: Arc<CardanoClient>,
        poll_interval: Duration,
        pending_expiry_secs: i64,
    ) -> Self {
        Self {
            db,
            chain,
            poll_interval,
            pending_expiry_secs,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Spawns the background poll loop. The first sweep runs immediately so
    /// transactions left pending across a restart are re-checked at startup.
    pub fn start_background_poll_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut ticker = interval(self.poll_interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match self.poll_once().await {
                            Ok(summary) if summary.checked > 0 || summary.expired > 0 => {
                                println!(
                                    "> TxTracker: checked {} pending tx(s), {} confirmed, {} expired.",
                                    summary.checked, summary.confirmed, summary.expired
                                );
                            }
                            Ok(_) => {}
                            Err(e) => {
                                eprintln!("> TxTracker: poll failed: {}", e);
                            }
                        }
                    }
                    _ = self.shutdown.notified() => {
                        println!("> TxTracker: shutdown signal received, stopping poll task.");
                        break;
                    }
                }
            }
        });
    }

    /// One sweep over the pending set. Public so shutdown (and tests) can
    /// run a final pass synchronously.
    pub async fn poll_once(&self) -> anyhow::Result<PollSummary> {
        let pending = self.db.pending_transactions(100).await?;
        let mut summary = PollSummary {
            checked: pending.len(),
            ..Default::default()
        };

        for tx in &pending {
            match self.chain.transaction(&tx.tx_hash).await {
                Ok(Some(info)) => {
                    let confirmed_at = DateTime::<Utc>::from_timestamp(info.block_time, 0)
                        .unwrap_or_else(Utc::now);
                    self.db
                        .mark_transaction(&tx.tx_hash, TxStatus::Completed, Some(confirmed_at))
                        .await?;
                    summary.confirmed += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    // Upstream hiccups are retried on the next tick; one
                    // unreachable API call must not fail the whole sweep.
                    eprintln!("> TxTracker: lookup failed for {}: {}", tx.tx_hash, e);
                }
            }
        }

        let cutoff = Utc::now() - ChronoDuration::seconds(self.pending_expiry_secs);
        summary.expired = self.db.expire_stale_pending(cutoff).await?;

        Ok(summary)
    }

    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}
