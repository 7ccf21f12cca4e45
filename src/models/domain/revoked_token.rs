use chrono::{DateTime, Utc};
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

/// A session token that was logged out before it expired.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RevokedToken {
    pub token_hash: String,
    pub user_id: String,
    /// Stored as a BSON date so the TTL index can expire it.
    pub expires_at: BsonDateTime,
    pub revoked_at: DateTime<Utc>,
}

impl RevokedToken {
    pub fn new(token: &str, user_id: &str, expires_at_unix: usize) -> Self {
        Self {
            token_hash: hash_token(token),
            user_id: user_id.to_string(),
            expires_at: BsonDateTime::from_millis(expires_at_unix as i64 * 1000),
            revoked_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.timestamp_millis() <= Utc::now().timestamp_millis()
    }
}

pub fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
