// Canonical fingerprinting for proof-of-existence records.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

// Domain separation constant so a note fingerprint can never collide with
// other sha256 uses of the same JSON document.
const NOTE_DOMAIN: &[u8] = b"NOTECHAIN1";

/// A helper function to sort a JSON object's keys recursively.
/// This is essential for canonical serialization.
fn sort_json_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted_map: BTreeMap<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), sort_json_value(v)))
                .collect();
            Value::Object(sorted_map.into_iter().collect())
        }
        Value::Array(arr) => {
            let sorted_arr = arr.iter().map(sort_json_value).collect();
            Value::Array(sorted_arr)
        }
        _ => value.clone(),
    }
}

/// Hashes a JSON value into a lowercase hex SHA-256 digest.
/// It ensures canonical serialization by sorting keys.
pub fn hash_value(value: &Value) -> String {
    let sorted_value = sort_json_value(value);
    let canonical_string =
        serde_json::to_string(&sorted_value).expect("sorted JSON value serializes");

    let mut hasher = Sha256::new();
    hasher.update(NOTE_DOMAIN);
    hasher.update(canonical_string.as_bytes());
    hex::encode(hasher.finalize())
}

/// Computes the fingerprint a client embeds in transaction metadata when
/// recording a note on chain: the canonical hash of the note's title,
/// content, and creation instant (RFC3339, second precision).
pub fn note_fingerprint(title: &str, content: &str, created_at: DateTime<Utc>) -> String {
    let doc = serde_json::json!({
        "title": title,
        "content": content,
        "createdAt": created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    });
    hash_value(&doc)
}

/// Checks that `s` is a well-formed Cardano transaction hash
/// (32 bytes, lowercase or uppercase hex).
pub fn is_valid_tx_hash(s: &str) -> bool {
    s.len() == 64 && hex::decode(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn hash_is_key_order_independent() {
        let a = serde_json::json!({"title": "x", "content": "y"});
        let b = serde_json::json!({"content": "y", "title": "x"});
        assert_eq!(hash_value(&a), hash_value(&b));
    }

    #[test]
    fn hash_differs_on_content_change() {
        let a = serde_json::json!({"title": "x", "content": "y"});
        let b = serde_json::json!({"title": "x", "content": "z"});
        assert_ne!(hash_value(&a), hash_value(&b));
    }

    #[test]
    fn fingerprint_is_stable() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let f1 = note_fingerprint("Groceries", "milk, eggs", t);
        let f2 = note_fingerprint("Groceries", "milk, eggs", t);
        assert_eq!(f1, f2);
        assert_eq!(f1.len(), 64);
        assert_ne!(f1, note_fingerprint("Groceries", "milk", t));
    }

    #[test]
    fn tx_hash_validation() {
        let good = "a".repeat(64);
        assert!(is_valid_tx_hash(&good));
        assert!(!is_valid_tx_hash("abc123"));
        assert!(!is_valid_tx_hash(&"g".repeat(64)));
    }
}
