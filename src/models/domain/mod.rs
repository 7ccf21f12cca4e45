pub mod quiz;
pub mod revoked_token;
pub mod submission;
pub mod user;
pub use quiz::{Difficulty, Quiz, QuizQuestion};
pub use revoked_token::RevokedToken;
pub use submission::Submission;
pub use user::{User, UserRole};
