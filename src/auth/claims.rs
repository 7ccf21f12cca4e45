use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{User, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub name: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
    /// Per-token id, so two sessions issued in the same second can be revoked
    /// independently.
    pub jti: String,
}

impl Claims {
    pub fn new(user: &User, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn is_teacher(&self) -> bool {
        self.role == UserRole::Teacher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user = User::test_teacher("Ada");
        let claims = Claims::new(&user, 24);

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.name, "Ada");
        assert!(claims.is_teacher());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_student_claims() {
        let claims = Claims::new(&User::test_student("Sam"), 1);
        assert!(!claims.is_teacher());
        assert_eq!(claims.role, UserRole::Student);
    }

    #[test]
    fn test_each_token_gets_its_own_id() {
        let user = User::test_student("Sam");
        assert_ne!(Claims::new(&user, 1).jti, Claims::new(&user, 1).jti);
    }
}
