// Responsible for all communication with the Cardano network, via a
// Blockfrost-compatible HTTP API. Transaction building and signing live in
// the user's wallet; this client only reads chain state and relays
// already-signed transactions.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::infra::config;

/// Balance summary for an address.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressBalance {
    pub address: String,
    /// Total lovelace held (1 ADA = 1_000_000 lovelace).
    pub lovelace: u64,
}

/// On-chain transaction info, as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TxInfo {
    pub hash: String,
    /// Hash of the containing block.
    pub block: String,
    pub block_height: i64,
    /// Unix time of the containing block.
    pub block_time: i64,
}

// Blockfrost reports address holdings as {unit, quantity} pairs; quantity is
// a decimal string because asset quantities can exceed u64 in JSON clients.
#[derive(Debug, Deserialize)]
struct AmountEntry {
    unit: String,
    quantity: String,
}

#[derive(Debug, Deserialize)]
struct AddressInfo {
    amount: Vec<AmountEntry>,
}

pub struct CardanoClient {
    http: reqwest::Client,
    base_url: String,
    project_id: Option<String>,
}

impl CardanoClient {
    /// Builds a client from `CARDANO_API_URL` / `CARDANO_PROJECT_ID`.
    pub fn from_env() -> Self {
        Self::new(config::cardano_api_url(), config::cardano_project_id())
    }

    pub fn new(base_url: String, project_id: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("reqwest client builds");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.get(format!("{}{}", self.base_url, path));
        if let Some(id) = &self.project_id {
            req = req.header("project_id", id);
        }
        req
    }

    /// API liveness probe (used by preflight).
    pub async fn health(&self) -> anyhow::Result<bool> {
        #[derive(Deserialize)]
        struct Health {
            is_healthy: bool,
        }
        let resp = self.get("/health").send().await?;
        if !resp.status().is_success() {
            return Err(anyhow::anyhow!(
                "Cardano API health check returned {}",
                resp.status()
            ));
        }
        let health: Health = resp.json().await?;
        Ok(health.is_healthy)
    }

    /// Total lovelace held by `address`.
    pub async fn address_balance(&self, address: &str) -> anyhow::Result<AddressBalance> {
        let resp = self.get(&format!("/addresses/{}", address)).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow::anyhow!(
                "Cardano API returned {} for address {}",
                resp.status(),
                address
            ));
        }
        let info: AddressInfo = resp.json().await?;
        let lovelace = info
            .amount
            .iter()
            .find(|a| a.unit == "lovelace")
            .map(|a| a.quantity.parse::<u64>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("Malformed lovelace quantity: {}", e))?
            .unwrap_or(0);
        Ok(AddressBalance {
            address: address.to_string(),
            lovelace,
        })
    }

    /// Looks up a transaction by hash. `Ok(None)` means the chain has not
    /// seen it (yet) — that is a normal state for freshly submitted txs.
    pub async fn transaction(&self, tx_hash: &str) -> anyhow::Result<Option<TxInfo>> {
        let resp = self.get(&format!("/txs/{}", tx_hash)).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(anyhow::anyhow!(
                "Cardano API returned {} for tx {}",
                resp.status(),
                tx_hash
            ));
        }
        let info: TxInfo = resp.json().await?;
        Ok(Some(info))
    }

    /// Relays an already-signed transaction (hex-encoded CBOR) to the chain.
    /// Returns the transaction hash reported by the API.
    pub async fn submit_transaction(&self, cbor_hex: &str) -> anyhow::Result<String> {
        let bytes = hex::decode(cbor_hex.trim())
            .map_err(|e| anyhow::anyhow!("cborHex is not valid hex: {}", e))?;

        let mut req = self
            .http
            .post(format!("{}/tx/submit", self.base_url))
            .header("Content-Type", "application/cbor")
            .body(bytes);
        if let Some(id) = &self.project_id {
            req = req.header("project_id", id);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Transaction submission rejected ({}): {}",
                status,
                body
            ));
        }
        // The submit endpoint returns the tx hash as a JSON string.
        let tx_hash: String = resp.json().await?;
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn submit_rejects_malformed_hex_before_sending() {
        let client = CardanoClient::new("http://127.0.0.1:1".to_string(), None);
        let err = client.submit_transaction("not-hex!").await.unwrap_err();
        assert!(err.to_string().contains("not valid hex"));
    }

    #[test]
    fn base_url_is_normalized() {
        let client = CardanoClient::new("https://api.example/v0/".to_string(), None);
        assert_eq!(client.base_url, "https://api.example/v0");
    }
}
