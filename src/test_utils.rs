use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    app_state::{AppParts, AppState},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Quiz, RevokedToken, Submission, User},
    repositories::{QuizRepository, RevokedTokenRepository, SubmissionRepository, UserRepository},
    services::{OAuthProvider, QuizGenerator},
};

/// One set of in-memory repositories, shared by the handlers under test and
/// by assertions that inspect storage directly.
#[derive(Clone, Default)]
pub struct InMemoryRepos {
    pub users: Arc<InMemoryUserRepository>,
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub submissions: Arc<InMemorySubmissionRepository>,
    pub revoked_tokens: Arc<InMemoryRevokedTokenRepository>,
}

impl InMemoryRepos {
    pub fn state(
        &self,
        config: Config,
        generator: Arc<dyn QuizGenerator>,
        oauth: Arc<dyn OAuthProvider>,
    ) -> AppState {
        let parts = AppParts {
            users: self.users.clone(),
            quizzes: self.quizzes.clone(),
            submissions: self.submissions.clone(),
            revoked_tokens: self.revoked_tokens.clone(),
            generator,
            oauth,
        };
        AppState::from_parts(config, parts, None)
    }
}

/// Application state over fresh in-memory storage, without a database.
#[cfg(test)]
pub fn test_state(
    generator: crate::services::quiz_generator::MockQuizGenerator,
    oauth: crate::services::google_oauth::MockOAuthProvider,
) -> AppState {
    InMemoryRepos::default().state(Config::test_config(), Arc::new(generator), Arc::new(oauth))
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn link_google_id(&self, id: &str, google_id: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))?;
        user.google_id = Some(google_id.to_string());
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<Vec<Quiz>>>,
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.iter().any(|q| q.share_code == quiz.share_code) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with code '{}' already exists",
                quiz.share_code
            )));
        }
        quizzes.push(quiz.clone());
        Ok(quiz)
    }

    async fn find_by_share_code(&self, share_code: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.iter().find(|q| q.share_code == share_code).cloned())
    }

    async fn share_code_exists(&self, share_code: &str) -> AppResult<bool> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.iter().any(|q| q.share_code == share_code))
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.iter().filter(|q| ids.contains(&q.id)).cloned().collect())
    }

    async fn list_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut owned: Vec<Quiz> = quizzes
            .iter()
            .filter(|q| q.teacher_id == teacher_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

impl InMemoryQuizRepository {
    /// Drops a quiz while leaving its submissions behind.
    pub async fn remove(&self, quiz_id: &str) {
        self.quizzes.write().await.retain(|q| q.id != quiz_id);
    }
}

#[derive(Default)]
pub struct InMemorySubmissionRepository {
    submissions: Arc<RwLock<Vec<Submission>>>,
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        let mut submissions = self.submissions.write().await;
        let duplicate = submission.is_single_attempt()
            && submissions.iter().any(|s| {
                s.is_single_attempt()
                    && s.quiz_id == submission.quiz_id
                    && s.student_id == submission.student_id
            });
        if duplicate {
            return Err(AppError::AlreadySubmitted);
        }
        submissions.push(submission.clone());
        Ok(submission)
    }

    async fn has_submitted(&self, quiz_id: &str, student_id: &str) -> AppResult<bool> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .iter()
            .any(|s| s.quiz_id == quiz_id && s.student_id == student_id))
    }

    async fn count_by_quiz(&self, quiz_id: &str) -> AppResult<u64> {
        let submissions = self.submissions.read().await;
        Ok(submissions.iter().filter(|s| s.quiz_id == quiz_id).count() as u64)
    }

    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        let mut matching: Vec<Submission> = submissions
            .iter()
            .filter(|s| s.quiz_id == quiz_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(matching)
    }

    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        let mut matching: Vec<Submission> = submissions
            .iter()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(matching)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRevokedTokenRepository {
    revoked: Arc<RwLock<HashMap<String, RevokedToken>>>,
}

#[async_trait]
impl RevokedTokenRepository for InMemoryRevokedTokenRepository {
    async fn revoke(&self, token: RevokedToken) -> AppResult<()> {
        self.revoked
            .write()
            .await
            .entry(token.token_hash.clone())
            .or_insert(token);
        Ok(())
    }

    async fn is_revoked(&self, token_hash: &str) -> AppResult<bool> {
        Ok(self.revoked.read().await.contains_key(token_hash))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub mod fixtures {
    use crate::models::domain::{Difficulty, Quiz, QuizQuestion};

    /// Question whose correct option is `correct` ("a" to "d").
    pub fn question(text: &str, correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec![
                "first".to_string(),
                "second".to_string(),
                "third".to_string(),
                "fourth".to_string(),
            ],
            correct_answer: correct.to_string(),
        }
    }

    /// Three questions answered correctly by `["a", "b", "c"]`.
    pub fn questions() -> Vec<QuizQuestion> {
        vec![
            question("Question 1", "a"),
            question("Question 2", "b"),
            question("Question 3", "c"),
        ]
    }

    pub fn quiz(teacher_id: &str, share_code: &str) -> Quiz {
        Quiz::new(teacher_id, "Rivers", Difficulty::Medium, questions(), share_code)
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}
