//! Centralized configuration (environment variables + defaults).

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

/// Secret used to sign and verify bearer tokens (required).
pub fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").expect("JWT_SECRET must be set")
}

/// Token lifetime in days (default: 7, matching the web client's session length).
pub fn token_ttl_days() -> i64 {
    match std::env::var("TOKEN_TTL_DAYS") {
        Ok(v) => v
            .parse::<i64>()
            .expect("TOKEN_TTL_DAYS must be a valid integer")
            .max(1),
        Err(_) => 7,
    }
}

/// Base URL of the Blockfrost-compatible Cardano API (required).
pub fn cardano_api_url() -> String {
    std::env::var("CARDANO_API_URL").expect("CARDANO_API_URL must be set")
}

/// Project id sent as the `project_id` header to the Cardano API.
///
/// Optional: some self-hosted gateways do not require one.
pub fn cardano_project_id() -> Option<String> {
    std::env::var("CARDANO_PROJECT_ID").ok().filter(|v| !v.is_empty())
}

/// Seconds between background polls of pending chain transactions (default: 60).
pub fn tx_poll_interval_secs() -> u64 {
    match std::env::var("TX_POLL_INTERVAL_SECS") {
        Ok(v) => v
            .parse::<u64>()
            .expect("TX_POLL_INTERVAL_SECS must be a valid u64")
            .max(1),
        Err(_) => 60,
    }
}

/// Seconds after which a still-unseen pending transaction is marked failed
/// (default: 86400 — one day is far beyond any realistic confirmation time).
pub fn tx_pending_expiry_secs() -> i64 {
    match std::env::var("TX_PENDING_EXPIRY_SECS") {
        Ok(v) => v
            .parse::<i64>()
            .expect("TX_PENDING_EXPIRY_SECS must be a valid integer")
            .max(60),
        Err(_) => 86_400,
    }
}

/// Socket address the API server binds to (default: 0.0.0.0:4000).
pub fn bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_vars_have_defaults() {
        std::env::remove_var("TOKEN_TTL_DAYS");
        std::env::remove_var("TX_POLL_INTERVAL_SECS");
        std::env::remove_var("TX_PENDING_EXPIRY_SECS");
        std::env::remove_var("BIND_ADDR");
        assert_eq!(token_ttl_days(), 7);
        assert_eq!(tx_poll_interval_secs(), 60);
        assert_eq!(tx_pending_expiry_secs(), 86_400);
        assert_eq!(bind_addr(), "0.0.0.0:4000");
    }

    #[test]
    fn project_id_empty_string_is_none() {
        std::env::set_var("CARDANO_PROJECT_ID", "");
        assert!(cardano_project_id().is_none());
        std::env::set_var("CARDANO_PROJECT_ID", "preview123");
        assert_eq!(cardano_project_id().as_deref(), Some("preview123"));
        std::env::remove_var("CARDANO_PROJECT_ID");
    }
}
