use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::Row;
use utoipa::ToSchema;

/// A registered account. `password_hash` is an Argon2id PHC string and is
/// never serialized to clients.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub cardano_address: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            cardano_address: row.try_get("cardano_address")?,
            created_at: row.try_get("created_at")?,
        })
    }

    /// The client-safe view returned by login.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
            cardano_address: self.cardano_address.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub cardano_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn public_view_omits_password_hash() {
        let user = User {
            id: 7,
            name: "Test User".to_string(),
            username: "testuser".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            cardano_address: "addr_test1qabc".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(user.public()).unwrap();
        assert_eq!(json["username"], "testuser");
        assert_eq!(json["cardanoAddress"], "addr_test1qabc");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
