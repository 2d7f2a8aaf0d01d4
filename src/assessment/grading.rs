//! Quiz grading: scores a set of submitted answers against a quiz's
//! questions and correct-option flags.
//!
//! Grading is a pure pass over in-memory data. The caller stages the result
//! and commits the attempt in a single transaction (db::attempts), so a
//! partially-graded attempt is never observable.

use std::collections::HashMap;

use crate::domain::{Question, QuizAnswer};

pub struct GradedSubmission {
  pub score: f64,
  pub passed: bool,
  pub total_points: i64,
  pub earned_points: i64,
  /// One entry per answered question, in quiz order. Unanswered questions
  /// are scored as incorrect but produce no answer record.
  pub answers: Vec<QuizAnswer>,
}

/// Grade submitted answers (question id -> selected option id) against the
/// quiz's questions, which must be in quiz order with options loaded.
///
/// A question with no option flagged correct can never be answered
/// correctly. A zero-point quiz scores 0, never NaN.
pub fn grade(
  questions: &[Question],
  passing_score: i64,
  answers: &HashMap<i64, i64>,
) -> GradedSubmission {
  let mut total_points = 0;
  let mut earned_points = 0;
  let mut graded = Vec::new();

  for question in questions {
    total_points += question.points;

    let Some(&selected) = answers.get(&question.id) else {
      continue;
    };

    let is_correct = question.correct_option_id() == Some(selected);
    if is_correct {
      earned_points += question.points;
    }

    graded.push(QuizAnswer {
      question_id: question.id,
      option_id: selected,
      is_correct,
    });
  }

  let score = if total_points > 0 {
    (earned_points as f64 / total_points as f64) * 100.0
  } else {
    0.0
  };

  GradedSubmission {
    score,
    passed: score >= passing_score as f64,
    total_points,
    earned_points,
    answers: graded,
  }
}
