use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Quiz {
  pub id: i64,
  pub chapter_id: i64,
  pub title: String,
  pub description: Option<String>,
  /// Minimum score (0-100) required to pass
  pub passing_score: i64,
  pub position: i64,
  pub is_published: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
  pub id: i64,
  pub quiz_id: i64,
  pub prompt: String,
  pub points: i64,
  pub explanation: Option<String>,
  pub position: i64,
  /// Options in position order; exactly one should be flagged correct,
  /// but the grader tolerates malformed questions (see assessment::grading)
  pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionOption {
  pub id: i64,
  pub question_id: i64,
  pub text: String,
  pub is_correct: bool,
  pub position: i64,
}

impl Question {
  /// Id of the option flagged correct, if any.
  pub fn correct_option_id(&self) -> Option<i64> {
    self.options.iter().find(|o| o.is_correct).map(|o| o.id)
  }
}
