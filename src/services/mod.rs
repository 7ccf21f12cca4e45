pub mod google_oauth;
pub mod grading;
pub mod quiz_generator;
pub mod quiz_service;
pub mod session_service;
pub mod submission_service;
pub mod user_service;

pub use google_oauth::{GoogleOAuthClient, GoogleProfile, OAuthProvider};
pub use quiz_generator::{OpenAiQuizGenerator, QuizGenerator};
pub use quiz_service::QuizService;
pub use session_service::SessionService;
pub use submission_service::SubmissionService;
pub use user_service::UserService;
