use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use utoipa::ToSchema;

/// Lifecycle of a recorded proof-of-existence transaction.
///
/// A hash enters as `Pending` when a note stores it, becomes `Completed`
/// once the tx is visible on chain, and `Failed` if it never appears within
/// the expiry window (e.g. the wallet's submission was rolled back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Pending,
    Completed,
    Failed,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Completed => "completed",
            TxStatus::Failed => "failed",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "completed" => TxStatus::Completed,
            "failed" => TxStatus::Failed,
            _ => TxStatus::Pending,
        }
    }
}

/// Tracking record for one transaction hash attached to a note.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainTransaction {
    pub tx_hash: String,
    pub note_id: i64,
    pub status: TxStatus,
    pub recorded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl ChainTransaction {
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        Ok(ChainTransaction {
            tx_hash: row.try_get("tx_hash")?,
            note_id: row.try_get("note_id")?,
            status: TxStatus::from_db_str(&status),
            recorded_at: row.try_get("recorded_at")?,
            confirmed_at: row.try_get("confirmed_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for s in [TxStatus::Pending, TxStatus::Completed, TxStatus::Failed] {
            assert_eq!(TxStatus::from_db_str(s.as_str()), s);
        }
        assert_eq!(TxStatus::from_db_str("garbage"), TxStatus::Pending);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TxStatus::Completed).unwrap(),
            "\"completed\""
        );
    }
}
