use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Difficulty, Quiz, QuizQuestion, User, UserRole};

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserDto,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl From<QuizQuestion> for QuestionDto {
    fn from(question: QuizQuestion) -> Self {
        QuestionDto {
            question: question.question,
            options: question.options,
            correct_answer: question.correct_answer,
        }
    }
}

/// Question as shown to someone taking the quiz.
#[derive(Debug, Clone, Serialize)]
pub struct StudentQuestionDto {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuizResponse {
    pub quiz_id: String,
    pub shareable_code: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuestionDto>,
}

impl From<Quiz> for GeneratedQuizResponse {
    fn from(quiz: Quiz) -> Self {
        GeneratedQuizResponse {
            quiz_id: quiz.id,
            shareable_code: quiz.share_code,
            topic: quiz.topic,
            difficulty: quiz.difficulty,
            questions: quiz.questions.into_iter().map(QuestionDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuizResponse {
    pub quiz_id: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<StudentQuestionDto>,
}

impl From<Quiz> for StudentQuizResponse {
    fn from(quiz: Quiz) -> Self {
        StudentQuizResponse {
            quiz_id: quiz.id,
            topic: quiz.topic,
            difficulty: quiz.difficulty,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| StudentQuestionDto {
                    question: q.question,
                    options: q.options,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherQuizSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub shareable_code: String,
    pub created_at: DateTime<Utc>,
    pub submission_count: u64,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub xp_earned: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResultDto {
    pub student_name: String,
    pub score: u32,
    pub percentage: u32,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultsResponse {
    pub topic: String,
    pub difficulty: Difficulty,
    pub total_questions: u32,
    pub submissions: Vec<SubmissionResultDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSubmissionDto {
    pub quiz_topic: String,
    pub quiz_difficulty: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub submitted_at: DateTime<Utc>,
}
