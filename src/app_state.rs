use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuizRepository, MongoRevokedTokenRepository, MongoSubmissionRepository,
        MongoUserRepository, QuizRepository, RevokedTokenRepository, SubmissionRepository,
        UserRepository,
    },
    services::{
        GoogleOAuthClient, OAuthProvider, OpenAiQuizGenerator, QuizGenerator, QuizService,
        SessionService, SubmissionService, UserService,
    },
};

/// Storage and outbound clients the services are built from.
pub struct AppParts {
    pub users: Arc<dyn UserRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub revoked_tokens: Arc<dyn RevokedTokenRepository>,
    pub generator: Arc<dyn QuizGenerator>,
    pub oauth: Arc<dyn OAuthProvider>,
}

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub quiz_service: Arc<QuizService>,
    pub submission_service: Arc<SubmissionService>,
    pub session_service: Arc<SessionService>,
    pub oauth: Arc<dyn OAuthProvider>,
    pub config: Arc<Config>,
    /// `None` when running without MongoDB (tests).
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let users = Arc::new(MongoUserRepository::new(&db));
        users.ensure_indexes().await?;
        let quizzes = Arc::new(MongoQuizRepository::new(&db));
        quizzes.ensure_indexes().await?;
        let submissions = Arc::new(MongoSubmissionRepository::new(&db));
        submissions.ensure_indexes().await?;
        let revoked_tokens = Arc::new(MongoRevokedTokenRepository::new(&db));
        revoked_tokens.ensure_indexes().await?;

        let parts = AppParts {
            users,
            quizzes,
            submissions,
            revoked_tokens,
            generator: Arc::new(OpenAiQuizGenerator::new(&config)),
            oauth: Arc::new(GoogleOAuthClient::new(&config)),
        };

        Ok(Self::from_parts(config, parts, Some(db)))
    }

    pub fn from_parts(config: Config, parts: AppParts, db: Option<Database>) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        Self {
            user_service: Arc::new(UserService::new(parts.users.clone())),
            quiz_service: Arc::new(QuizService::new(
                parts.quizzes.clone(),
                parts.submissions.clone(),
                parts.generator,
            )),
            submission_service: Arc::new(SubmissionService::new(
                parts.quizzes,
                parts.submissions,
                parts.users,
            )),
            session_service: Arc::new(SessionService::new(jwt, parts.revoked_tokens)),
            oauth: parts.oauth,
            config: Arc::new(config),
            db,
        }
    }
}
