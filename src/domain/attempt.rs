use serde::Serialize;

/// A graded quiz attempt. Score and passed are fixed at creation; retakes
/// create new attempts rather than mutating prior ones.
#[derive(Debug, Clone, Serialize)]
pub struct QuizAttempt {
  pub id: i64,
  pub user_id: i64,
  pub quiz_id: i64,
  pub score: f64,
  pub passed: bool,
  pub created_at: String,
}

/// A single graded answer within an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizAnswer {
  pub question_id: i64,
  pub option_id: i64,
  pub is_correct: bool,
}

/// Attempt with its answers, as returned by the attempt-history endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptWithAnswers {
  pub id: i64,
  pub score: f64,
  pub passed: bool,
  pub created_at: String,
  pub answers: Vec<QuizAnswer>,
}

/// Response payload for a quiz submission.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptResult {
  pub attempt_id: i64,
  pub score: f64,
  pub passed: bool,
  pub total_points: i64,
  pub earned_points: i64,
  pub passing_score: i64,
  pub answers: Vec<QuizAnswer>,
}
