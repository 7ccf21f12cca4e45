use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserRole;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Submission {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub student_name: String,
    /// Role of the account at submission time. Student rows are unique per
    /// quiz; teacher rows are not.
    pub role: UserRole,
    pub answers: Vec<String>,
    pub score: u32,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(
        quiz_id: &str,
        student_id: &str,
        student_name: &str,
        answers: Vec<String>,
        score: u32,
    ) -> Self {
        Submission {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            student_id: student_id.to_string(),
            student_name: student_name.trim().to_string(),
            role: UserRole::Student,
            answers,
            score,
            submitted_at: Utc::now(),
        }
    }

    pub fn submitted_as(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Whether this row counts against the one-attempt rule.
    pub fn is_single_attempt(&self) -> bool {
        self.role == UserRole::Student
    }
}
