//! Bearer-token issuance and verification (HS256).
//!
//! Tokens carry the identity fields the web client displays (`username`,
//! `name`) alongside the numeric user id, so authenticated handlers never
//! need a user lookup just to know who is calling.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub username: String,
    pub name: String,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
}

/// Signs a token for the given user, valid for `ttl_days`.
pub fn issue_token(
    secret: &str,
    user_id: i64,
    username: &str,
    name: &str,
    ttl_days: i64,
) -> anyhow::Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        name: name.to_string(),
        exp: (now + Duration::days(ttl_days)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
}

/// Verifies signature and expiry, returning the embedded claims.
pub fn verify_token(secret: &str, token: &str) -> anyhow::Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_and_verify_roundtrip() {
        let token = issue_token(SECRET, 42, "testuser", "Test User", 7).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "testuser");
        assert_eq!(claims.name, "Test User");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(SECRET, 42, "testuser", "Test User", 7).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(SECRET, 42, "testuser", "Test User", 7).unwrap();
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1] = format!("{}AA", parts[1]);
        assert!(verify_token(SECRET, &parts.join(".")).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Sign an already-expired token by hand.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            username: "u".to_string(),
            name: "n".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }
}
