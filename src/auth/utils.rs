use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

pub fn require_teacher(claims: &Claims) -> AppResult<()> {
    if !claims.is_teacher() {
        return Err(AppError::Forbidden(
            "Only teachers can perform this action".to_string(),
        ));
    }
    Ok(())
}

pub fn require_quiz_owner(claims: &Claims, quiz: &Quiz) -> AppResult<()> {
    if !quiz.is_owned_by(&claims.sub) {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }
    Ok(())
}
