use std::sync::Arc;

use rand::Rng;
use validator::Validate;

use crate::{
    auth::{require_quiz_owner, require_teacher, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{Difficulty, Quiz, QuizQuestion},
        dto::{
            request::GenerateQuizRequest,
            response::{QuizResultsResponse, SubmissionResultDto, TeacherQuizSummary},
        },
    },
    repositories::{QuizRepository, SubmissionRepository},
    services::{
        grading,
        quiz_generator::{QuizGenerationRequest, QuizGenerator},
    },
};

pub const SHARE_CODE_LENGTH: usize = 8;
const SHARE_CODE_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const MAX_SHARE_CODE_ATTEMPTS: usize = 16;

pub fn random_share_code() -> String {
    let mut rng = rand::thread_rng();
    (0..SHARE_CODE_LENGTH)
        .map(|_| SHARE_CODE_CHARSET[rng.gen_range(0..SHARE_CODE_CHARSET.len())] as char)
        .collect()
}

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    generator: Arc<dyn QuizGenerator>,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        generator: Arc<dyn QuizGenerator>,
    ) -> Self {
        Self {
            quizzes,
            submissions,
            generator,
        }
    }

    pub async fn find_by_code(&self, code: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_share_code(code.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
    }

    pub async fn generate_quiz(
        &self,
        claims: &Claims,
        request: GenerateQuizRequest,
    ) -> AppResult<Quiz> {
        require_teacher(claims)?;
        request.validate()?;

        let generation = QuizGenerationRequest {
            topic: request.topic(),
            question_count: request.num_questions(),
            difficulty: request.difficulty(),
        };
        let questions = self.generator.generate(&generation).await?;

        if questions.len() as u32 != generation.question_count {
            log::warn!(
                "Asked for {} questions, model returned {}",
                generation.question_count,
                questions.len()
            );
        }

        self.store_with_unique_code(
            &claims.sub,
            &generation.topic,
            generation.difficulty,
            questions,
        )
        .await
    }

    async fn store_with_unique_code(
        &self,
        teacher_id: &str,
        topic: &str,
        difficulty: Difficulty,
        questions: Vec<QuizQuestion>,
    ) -> AppResult<Quiz> {
        for _ in 0..MAX_SHARE_CODE_ATTEMPTS {
            let code = random_share_code();
            if self.quizzes.share_code_exists(&code).await? {
                continue;
            }

            let quiz = Quiz::new(teacher_id, topic, difficulty, questions.clone(), &code);
            match self.quizzes.create(quiz).await {
                Ok(quiz) => {
                    log::info!(
                        "Teacher {} created quiz {} ({})",
                        teacher_id,
                        quiz.id,
                        quiz.share_code
                    );
                    return Ok(quiz);
                }
                // Lost a race for the code; draw again.
                Err(AppError::AlreadyExists(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::InternalError(format!(
            "No free share code after {} attempts",
            MAX_SHARE_CODE_ATTEMPTS
        )))
    }

    /// The quiz as a participant sees it. Anyone who already has a submission
    /// on record is turned away.
    pub async fn get_for_participant(&self, claims: &Claims, code: &str) -> AppResult<Quiz> {
        let quiz = self.find_by_code(code).await?;

        if self.submissions.has_submitted(&quiz.id, &claims.sub).await? {
            return Err(AppError::AlreadySubmitted);
        }

        Ok(quiz)
    }

    pub async fn teacher_quizzes(&self, claims: &Claims) -> AppResult<Vec<TeacherQuizSummary>> {
        require_teacher(claims)?;

        let quizzes = self.quizzes.list_by_teacher(&claims.sub).await?;
        let mut summaries = Vec::with_capacity(quizzes.len());
        for quiz in quizzes {
            let submission_count = self.submissions.count_by_quiz(&quiz.id).await?;
            summaries.push(TeacherQuizSummary {
                id: quiz.id,
                topic: quiz.topic,
                difficulty: quiz.difficulty,
                shareable_code: quiz.share_code,
                created_at: quiz.created_at,
                submission_count,
            });
        }

        Ok(summaries)
    }

    pub async fn quiz_results(&self, claims: &Claims, code: &str) -> AppResult<QuizResultsResponse> {
        require_teacher(claims)?;
        let quiz = self.find_by_code(code).await?;
        require_quiz_owner(claims, &quiz)?;

        let total = quiz.total_questions();
        let submissions = self
            .submissions
            .list_by_quiz(&quiz.id)
            .await?
            .into_iter()
            .map(|s| SubmissionResultDto {
                student_name: s.student_name,
                score: s.score,
                percentage: grading::percentage(s.score, total),
                submitted_at: s.submitted_at,
            })
            .collect();

        Ok(QuizResultsResponse {
            topic: quiz.topic,
            difficulty: quiz.difficulty,
            total_questions: total,
            submissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{Submission, User},
        services::quiz_generator::MockQuizGenerator,
        test_utils::{fixtures, InMemoryQuizRepository, InMemorySubmissionRepository},
    };

    struct Fixture {
        quizzes: Arc<InMemoryQuizRepository>,
        submissions: Arc<InMemorySubmissionRepository>,
        service: QuizService,
    }

    fn fixture(generator: MockQuizGenerator) -> Fixture {
        let quizzes = Arc::new(InMemoryQuizRepository::default());
        let submissions = Arc::new(InMemorySubmissionRepository::default());
        let service = QuizService::new(quizzes.clone(), submissions.clone(), Arc::new(generator));
        Fixture {
            quizzes,
            submissions,
            service,
        }
    }

    fn claims_for(user: &User) -> Claims {
        Claims::new(user, 1)
    }

    #[test]
    fn test_share_code_shape() {
        for _ in 0..50 {
            let code = random_share_code();
            assert_eq!(code.len(), SHARE_CODE_LENGTH);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[tokio::test]
    async fn test_generate_quiz_stores_with_code() {
        let mut generator = MockQuizGenerator::new();
        generator
            .expect_generate()
            .withf(|req| {
                req.topic == "Rivers" && req.question_count == 3 && req.difficulty == Difficulty::Hard
            })
            .times(1)
            .returning(|_| Ok(fixtures::questions()));
        let f = fixture(generator);
        let teacher = User::test_teacher("Ada");

        let request = GenerateQuizRequest {
            topic: Some("Rivers".to_string()),
            num_questions: Some(3),
            difficulty: Some(Difficulty::Hard),
        };
        let quiz = f
            .service
            .generate_quiz(&claims_for(&teacher), request)
            .await
            .unwrap();

        assert_eq!(quiz.teacher_id, teacher.id);
        assert_eq!(quiz.questions.len(), 3);
        assert_eq!(quiz.share_code.len(), SHARE_CODE_LENGTH);
        assert!(f.quizzes.share_code_exists(&quiz.share_code).await.unwrap());
    }

    #[tokio::test]
    async fn test_generate_quiz_applies_defaults() {
        let mut generator = MockQuizGenerator::new();
        generator
            .expect_generate()
            .withf(|req| {
                req.topic == "general knowledge"
                    && req.question_count == 5
                    && req.difficulty == Difficulty::Medium
            })
            .returning(|_| Ok(fixtures::questions()));
        let f = fixture(generator);

        let quiz = f
            .service
            .generate_quiz(&claims_for(&User::test_teacher("Ada")), GenerateQuizRequest::default())
            .await
            .unwrap();
        assert_eq!(quiz.topic, "general knowledge");
    }

    #[tokio::test]
    async fn test_students_cannot_generate() {
        let mut generator = MockQuizGenerator::new();
        generator.expect_generate().never();
        let f = fixture(generator);

        let err = f
            .service
            .generate_quiz(&claims_for(&User::test_student("Sam")), GenerateQuizRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_generate_rejects_out_of_range_count() {
        let mut generator = MockQuizGenerator::new();
        generator.expect_generate().never();
        let f = fixture(generator);

        let request = GenerateQuizRequest {
            num_questions: Some(21),
            ..Default::default()
        };
        let err = f
            .service
            .generate_quiz(&claims_for(&User::test_teacher("Ada")), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let mut generator = MockQuizGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(AppError::Upstream("Failed to generate quiz".to_string())));
        let f = fixture(generator);

        let err = f
            .service
            .generate_quiz(&claims_for(&User::test_teacher("Ada")), GenerateQuizRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_participant_view_blocks_repeat_visit() {
        let f = fixture(MockQuizGenerator::new());
        let quiz = f.quizzes.create(fixtures::quiz("t1", "code0001")).await.unwrap();
        let student = User::test_student("Sam");

        assert!(f
            .service
            .get_for_participant(&claims_for(&student), "code0001")
            .await
            .is_ok());

        f.submissions
            .create(Submission::new(&quiz.id, &student.id, "Sam", vec![], 0))
            .await
            .unwrap();

        let err = f
            .service
            .get_for_participant(&claims_for(&student), "code0001")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadySubmitted));
    }

    #[tokio::test]
    async fn test_unknown_code() {
        let f = fixture(MockQuizGenerator::new());
        let err = f
            .service
            .get_for_participant(&claims_for(&User::test_student("Sam")), "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Quiz not found"));
    }

    #[tokio::test]
    async fn test_teacher_quizzes_counts_submissions() {
        let f = fixture(MockQuizGenerator::new());
        let teacher = User::test_teacher("Ada");
        let quiz = f
            .quizzes
            .create(fixtures::quiz(&teacher.id, "code0001"))
            .await
            .unwrap();
        f.quizzes.create(fixtures::quiz("someone-else", "code0002")).await.unwrap();
        for name in ["Sam", "Kim"] {
            f.submissions
                .create(Submission::new(&quiz.id, name, name, vec![], 1))
                .await
                .unwrap();
        }

        let summaries = f.service.teacher_quizzes(&claims_for(&teacher)).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].shareable_code, "code0001");
        assert_eq!(summaries[0].submission_count, 2);
    }

    #[tokio::test]
    async fn test_results_restricted_to_owner() {
        let f = fixture(MockQuizGenerator::new());
        let owner = User::test_teacher("Ada");
        let quiz = f
            .quizzes
            .create(fixtures::quiz(&owner.id, "code0001"))
            .await
            .unwrap();
        f.submissions
            .create(Submission::new(&quiz.id, "s1", " Sam ", vec![], 2))
            .await
            .unwrap();

        let results = f
            .service
            .quiz_results(&claims_for(&owner), "code0001")
            .await
            .unwrap();
        assert_eq!(results.total_questions, 3);
        assert_eq!(results.submissions.len(), 1);
        assert_eq!(results.submissions[0].student_name, "Sam");
        assert_eq!(results.submissions[0].percentage, 67);

        let other = User::test_teacher("Bob");
        let err = f
            .service
            .quiz_results(&claims_for(&other), "code0001")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg == "Access denied"));

        let err = f
            .service
            .quiz_results(&claims_for(&User::test_student("Sam")), "code0001")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
