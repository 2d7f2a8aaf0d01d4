//! Quiz authoring handlers: quizzes, questions, and options.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{require_chapter, require_course, require_quiz};
use crate::auth::AuthContext;
use crate::config;
use crate::db;
use crate::db::quizzes::NewOption;
use crate::domain::{Question, Quiz};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateQuizRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub passing_score: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateQuizRequest {
    pub is_published: bool,
}

#[derive(Deserialize)]
pub struct CreateQuestionRequest {
    pub prompt: String,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionRequest>,
}

#[derive(Deserialize)]
pub struct OptionRequest {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Serialize)]
pub struct QuizWithQuestions {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

/// GET /api/courses/{course_id}/chapters/{chapter_id}/quizzes
pub async fn list_quizzes(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path((course_id, chapter_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<QuizWithQuestions>>, ApiError> {
    let conn = db::try_lock(&state.db)?;
    require_chapter(&conn, course_id, chapter_id)?;

    let quizzes = db::quizzes::list_chapter_quizzes(&conn, chapter_id)?
        .into_iter()
        .map(|(quiz, questions)| QuizWithQuestions { quiz, questions })
        .collect();
    Ok(Json(quizzes))
}

/// POST /api/courses/{course_id}/chapters/{chapter_id}/quizzes (owner or admin)
pub async fn create_quiz(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((course_id, chapter_id)): Path<(i64, i64)>,
    Json(body): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    let passing_score = body.passing_score.unwrap_or(config::DEFAULT_PASSING_SCORE);
    if !(0..=100).contains(&passing_score) {
        return Err(ApiError::BadRequest(
            "passing_score must be between 0 and 100".to_string(),
        ));
    }

    let conn = db::try_lock(&state.db)?;
    let course = require_course(&conn, course_id)?;
    if !auth.can_edit_course(course.owner_id) {
        return Err(ApiError::Unauthorized);
    }
    require_chapter(&conn, course_id, chapter_id)?;

    let quiz = db::quizzes::create_quiz(
        &conn,
        chapter_id,
        body.title.trim(),
        body.description.as_deref(),
        passing_score,
    )?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// PATCH /api/courses/{course_id}/chapters/{chapter_id}/quizzes/{quiz_id}
pub async fn update_quiz(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((course_id, chapter_id, quiz_id)): Path<(i64, i64, i64)>,
    Json(body): Json<UpdateQuizRequest>,
) -> Result<Json<Quiz>, ApiError> {
    let conn = db::try_lock(&state.db)?;
    let course = require_course(&conn, course_id)?;
    if !auth.can_edit_course(course.owner_id) {
        return Err(ApiError::Unauthorized);
    }
    require_chapter(&conn, course_id, chapter_id)?;
    require_quiz(&conn, chapter_id, quiz_id)?;

    db::quizzes::set_quiz_published(&conn, quiz_id, body.is_published)?;
    let quiz = require_quiz(&conn, chapter_id, quiz_id)?;
    Ok(Json(quiz))
}

/// POST .../quizzes/{quiz_id}/questions (owner or admin)
pub async fn create_question(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((course_id, chapter_id, quiz_id)): Path<(i64, i64, i64)>,
    Json(body): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt is required".to_string()));
    }
    let points = body.points.unwrap_or(config::DEFAULT_QUESTION_POINTS);
    if points < 1 {
        return Err(ApiError::BadRequest("points must be at least 1".to_string()));
    }

    let conn = db::try_lock(&state.db)?;
    let course = require_course(&conn, course_id)?;
    if !auth.can_edit_course(course.owner_id) {
        return Err(ApiError::Unauthorized);
    }
    require_chapter(&conn, course_id, chapter_id)?;
    require_quiz(&conn, chapter_id, quiz_id)?;

    let options: Vec<NewOption<'_>> = body
        .options
        .iter()
        .map(|o| NewOption {
            text: o.text.as_str(),
            is_correct: o.is_correct,
        })
        .collect();

    let question = db::quizzes::create_question(
        &conn,
        quiz_id,
        body.prompt.trim(),
        points,
        body.explanation.as_deref(),
        &options,
    )?;
    Ok((StatusCode::CREATED, Json(question)))
}
