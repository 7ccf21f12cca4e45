use std::{collections::HashMap, sync::Arc};

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, Submission},
        dto::response::{StudentSubmissionDto, SubmitQuizResponse},
    },
    repositories::{QuizRepository, SubmissionRepository, UserRepository},
    services::grading,
};

const DELETED_QUIZ_TOPIC: &str = "Deleted Quiz";
const DELETED_QUIZ_DIFFICULTY: &str = "N/A";

pub struct SubmissionService {
    quizzes: Arc<dyn QuizRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    users: Arc<dyn UserRepository>,
}

impl SubmissionService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            quizzes,
            submissions,
            users,
        }
    }

    /// Grades and records an answer sheet. Students get one submission per
    /// quiz; teachers may submit as often as they like.
    pub async fn submit(
        &self,
        claims: &Claims,
        code: &str,
        answers: Vec<String>,
    ) -> AppResult<SubmitQuizResponse> {
        let quiz = self
            .quizzes
            .find_by_share_code(code.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        // Fast path only; storage rejects a concurrent second student row.
        if !claims.is_teacher() && self.submissions.has_submitted(&quiz.id, &claims.sub).await? {
            return Err(AppError::AlreadySubmitted);
        }

        // The account name is authoritative; the token copy may be stale.
        let student_name = match self.users.find_by_id(&claims.sub).await? {
            Some(user) => user.name,
            None => claims.name.clone(),
        };

        let score = grading::score(&quiz.questions, &answers);
        let total = quiz.total_questions();

        self.submissions
            .create(
                Submission::new(&quiz.id, &claims.sub, &student_name, answers, score)
                    .submitted_as(claims.role),
            )
            .await?;

        log::info!(
            "User {} scored {}/{} on quiz {}",
            claims.sub,
            score,
            total,
            quiz.id
        );

        Ok(SubmitQuizResponse {
            score,
            total,
            percentage: grading::percentage(score, total),
            xp_earned: grading::xp_earned(score, quiz.difficulty),
        })
    }

    pub async fn student_submissions(&self, claims: &Claims) -> AppResult<Vec<StudentSubmissionDto>> {
        let submissions = self.submissions.list_by_student(&claims.sub).await?;

        let mut quiz_ids: Vec<String> = submissions.iter().map(|s| s.quiz_id.clone()).collect();
        quiz_ids.sort();
        quiz_ids.dedup();

        let quizzes: HashMap<String, Quiz> = self
            .quizzes
            .find_by_ids(&quiz_ids)
            .await?
            .into_iter()
            .map(|quiz| (quiz.id.clone(), quiz))
            .collect();

        Ok(submissions
            .into_iter()
            .map(|submission| {
                let quiz = quizzes.get(&submission.quiz_id);
                let total_questions = quiz
                    .map(Quiz::total_questions)
                    .unwrap_or(submission.answers.len() as u32);

                StudentSubmissionDto {
                    quiz_topic: quiz
                        .map(|q| q.topic.clone())
                        .unwrap_or_else(|| DELETED_QUIZ_TOPIC.to_string()),
                    quiz_difficulty: quiz
                        .map(|q| q.difficulty.to_string())
                        .unwrap_or_else(|| DELETED_QUIZ_DIFFICULTY.to_string()),
                    score: submission.score,
                    total_questions,
                    percentage: grading::percentage(submission.score, total_questions),
                    submitted_at: submission.submitted_at,
                }
            })
            .collect())
    }
}
