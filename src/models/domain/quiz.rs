use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const OPTIONS_PER_QUESTION: usize = 4;

/// Answers are exchanged as option letters, `a` for the first option.
pub const ANSWER_LETTERS: [&str; OPTIONS_PER_QUESTION] = ["a", "b", "c", "d"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Letter of the correct option.
    pub correct_answer: String,
}

impl QuizQuestion {
    /// Resolves a model-supplied answer to an option letter. Accepts either a
    /// letter or the full text of one of the options.
    pub fn resolve_answer_letter(options: &[String], raw: &str) -> Option<String> {
        let raw = raw.trim();
        let lowered = raw.to_lowercase();
        if ANSWER_LETTERS.contains(&lowered.as_str()) {
            return Some(lowered);
        }

        options
            .iter()
            .position(|option| option.trim().eq_ignore_ascii_case(raw))
            .and_then(|index| ANSWER_LETTERS.get(index))
            .map(|letter| letter.to_string())
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        answer.trim().eq_ignore_ascii_case(&self.correct_answer)
    }

    /// Checks the stored-question invariants: non-empty text, exactly four
    /// options, and a correct answer naming one of them.
    pub fn check(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(format!(
                "each question must have exactly {} options, got {}",
                OPTIONS_PER_QUESTION,
                self.options.len()
            ));
        }
        if !ANSWER_LETTERS.contains(&self.correct_answer.as_str()) {
            return Err(format!(
                "correct answer '{}' does not name an option",
                self.correct_answer
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub teacher_id: String,
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
    pub share_code: String,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(
        teacher_id: &str,
        topic: &str,
        difficulty: Difficulty,
        questions: Vec<QuizQuestion>,
        share_code: &str,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            teacher_id: teacher_id.to_string(),
            topic: topic.to_string(),
            difficulty,
            questions,
            share_code: share_code.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn total_questions(&self) -> u32 {
        self.questions.len() as u32
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.teacher_id == user_id
    }
}
