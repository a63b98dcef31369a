use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::Row;
use utoipa::ToSchema;

/// A connected browser-wallet session, keyed by address. `wallet_type` is the
/// extension's injected namespace key (e.g. `nami`, `eternl`, `lace`).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub id: i64,
    pub wallet_type: String,
    pub wallet_address: String,
    pub connected_at: DateTime<Utc>,
}

impl WalletSession {
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(WalletSession {
            id: row.try_get("id")?,
            wallet_type: row.try_get("wallet_type")?,
            wallet_address: row.try_get("wallet_address")?,
            connected_at: row.try_get("connected_at")?,
        })
    }
}
