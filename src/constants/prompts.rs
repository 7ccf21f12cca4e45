use crate::models::domain::Difficulty;

pub const QUIZ_GENERATOR_SYSTEM_PROMPT: &str = "You are a quiz generator for classroom use. \
Generate quizzes in valid JSON format only. Return ONLY the JSON object, with no markdown fences, \
no commentary and no additional text.

Rules:
- Every question has exactly four answer options.
- Exactly one option is correct.
- correctAnswer is the letter of the correct option: \"a\" for the first option, \"b\" for the second, \"c\" for the third, \"d\" for the fourth.
- Options must not repeat and must not carry their own letter prefixes.
- Questions must be answerable without external material and must match the requested difficulty.";

pub fn quiz_user_prompt(
    question_count: u32,
    topic: &str,
    difficulty: Difficulty,
    schema: &str,
) -> String {
    format!(
        "Create a {question_count}-question multiple choice quiz about {topic} at a {difficulty} difficulty level. \
Format: {{\"questions\": [{{\"question\": \"...\", \"options\": [\"...\", \"...\", \"...\", \"...\"], \"correctAnswer\": \"a\"}}]}}\n\
The response must validate against this JSON schema:\n{schema}"
    )
}
