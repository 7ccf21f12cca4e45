use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Teacher,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "teacher" => Ok(UserRole::Teacher),
            "student" => Ok(UserRole::Student),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str, password_hash: &str, role: UserRole) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: Some(password_hash.to_string()),
            google_id: None,
            role,
            created_at: Utc::now(),
        }
    }

    /// Accounts created through Google sign-in start out as students and have
    /// no local password.
    pub fn from_google(google_id: &str, name: &str, email: &str) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: None,
            google_id: Some(google_id.to_string()),
            role: UserRole::Student,
            created_at: Utc::now(),
        }
    }

    pub fn is_google_only(&self) -> bool {
        self.google_id.is_some() && self.password_hash.is_none()
    }
}

#[cfg(test)]
impl User {
    pub fn test_teacher(name: &str) -> Self {
        User::new(
            name,
            &format!("{}@example.com", name.to_lowercase()),
            "not-a-real-hash",
            UserRole::Teacher,
        )
    }

    pub fn test_student(name: &str) -> Self {
        User::new(
            name,
            &format!("{}@example.com", name.to_lowercase()),
            "not-a-real-hash",
            UserRole::Student,
        )
    }
}
