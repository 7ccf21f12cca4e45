pub mod quiz_repository;
pub mod revoked_token_repository;
pub mod submission_repository;
pub mod user_repository;

use mongodb::error::{ErrorKind, WriteError, WriteFailure};

pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use revoked_token_repository::{MongoRevokedTokenRepository, RevokedTokenRepository};
pub use submission_repository::{MongoSubmissionRepository, SubmissionRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// True when an insert was rejected by a unique index.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY_CODE,
            ..
        }))
    )
}
