use crate::models::domain::{Difficulty, QuizQuestion};

const XP_PER_CORRECT_ANSWER: f64 = 10.0;

/// Counts positions where the submitted answer matches the stored correct
/// answer. Missing answers are wrong; answers past the last question are
/// ignored.
pub fn score(questions: &[QuizQuestion], answers: &[String]) -> u32 {
    questions
        .iter()
        .zip(answers.iter())
        .filter(|(question, answer)| question.is_correct(answer))
        .count() as u32
}

/// Whole-number percentage, rounded half up. Zero when there is nothing to
/// score against.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as u32
}

pub fn xp_multiplier(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 1.0,
        Difficulty::Medium => 1.5,
        Difficulty::Hard => 2.0,
    }
}

pub fn xp_earned(score: u32, difficulty: Difficulty) -> u32 {
    (score as f64 * XP_PER_CORRECT_ANSWER * xp_multiplier(difficulty)).round() as u32
}
