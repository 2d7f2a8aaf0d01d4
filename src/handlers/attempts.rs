//! Quiz submission and attempt history.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use super::{require_chapter, require_quiz};
use crate::assessment;
use crate::auth::AuthContext;
use crate::db;
use crate::domain::{AttemptResult, AttemptWithAnswers};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitRequest {
    /// Question id -> selected option id. Unanswered questions are omitted.
    pub answers: HashMap<i64, i64>,
}

/// POST .../quizzes/{quiz_id}/submit
///
/// Grades the submission against the quiz content and commits the attempt
/// with its answers in one transaction. Every call creates a new attempt;
/// retakes never overwrite earlier ones.
pub async fn submit_quiz(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((course_id, chapter_id, quiz_id)): Path<(i64, i64, i64)>,
    Json(body): Json<SubmitRequest>,
) -> Result<Json<AttemptResult>, ApiError> {
    let conn = db::try_lock(&state.db)?;
    require_chapter(&conn, course_id, chapter_id)?;
    require_quiz(&conn, chapter_id, quiz_id)?;

    let (quiz, questions) =
        db::quizzes::get_quiz_detail(&conn, quiz_id)?.ok_or(ApiError::NotFound("quiz"))?;

    let graded = assessment::grade(&questions, quiz.passing_score, &body.answers);
    let attempt = db::attempts::record_attempt(&conn, auth.user_id, quiz_id, &graded)?;

    tracing::debug!(
        "user {} scored {:.1} on quiz {} (passed: {})",
        auth.user_id,
        graded.score,
        quiz_id,
        graded.passed
    );

    Ok(Json(AttemptResult {
        attempt_id: attempt.id,
        score: graded.score,
        passed: graded.passed,
        total_points: graded.total_points,
        earned_points: graded.earned_points,
        passing_score: quiz.passing_score,
        answers: graded.answers,
    }))
}

/// GET .../quizzes/{quiz_id}/attempts - The caller's attempts, newest first
pub async fn list_attempts(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((course_id, chapter_id, quiz_id)): Path<(i64, i64, i64)>,
) -> Result<Json<Vec<AttemptWithAnswers>>, ApiError> {
    let conn = db::try_lock(&state.db)?;
    require_chapter(&conn, course_id, chapter_id)?;
    require_quiz(&conn, chapter_id, quiz_id)?;

    let attempts = db::attempts::list_attempts(&conn, auth.user_id, quiz_id)?;
    Ok(Json(attempts))
}
