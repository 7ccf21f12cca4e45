pub mod claims;
pub mod cookie;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod utils;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{presented_tokens, AuthMiddleware, AuthenticatedUser};
pub use utils::{require_quiz_owner, require_teacher};
