//! Chapter handlers: authoring and video-progress updates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use super::{require_chapter, require_course};
use crate::auth::AuthContext;
use crate::db;
use crate::domain::Chapter;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateChapterRequest {
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpdateChapterRequest {
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub is_free: Option<bool>,
}

#[derive(Deserialize)]
pub struct ProgressUpdateRequest {
    pub is_completed: bool,
}

/// POST /api/courses/{course_id}/chapters - Append a chapter (owner or admin)
pub async fn create_chapter(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(course_id): Path<i64>,
    Json(body): Json<CreateChapterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let conn = db::try_lock(&state.db)?;
    let course = require_course(&conn, course_id)?;
    if !auth.can_edit_course(course.owner_id) {
        return Err(ApiError::Unauthorized);
    }

    let chapter = db::chapters::create_chapter(&conn, course_id, body.title.trim())?;
    Ok((StatusCode::CREATED, Json(chapter)))
}

/// PATCH /api/courses/{course_id}/chapters/{chapter_id} - Publish/free flags
pub async fn update_chapter(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((course_id, chapter_id)): Path<(i64, i64)>,
    Json(body): Json<UpdateChapterRequest>,
) -> Result<Json<Chapter>, ApiError> {
    let conn = db::try_lock(&state.db)?;
    let course = require_course(&conn, course_id)?;
    if !auth.can_edit_course(course.owner_id) {
        return Err(ApiError::Unauthorized);
    }
    require_chapter(&conn, course_id, chapter_id)?;

    if let Some(published) = body.is_published {
        db::chapters::set_chapter_published(&conn, chapter_id, published)?;
    }
    if let Some(free) = body.is_free {
        db::chapters::set_chapter_free(&conn, chapter_id, free)?;
    }

    let chapter = require_chapter(&conn, course_id, chapter_id)?;
    Ok(Json(chapter))
}

/// PUT /api/courses/{course_id}/chapters/{chapter_id}/progress
///
/// Records the video player's completion event for the chapter.
pub async fn update_progress(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((course_id, chapter_id)): Path<(i64, i64)>,
    Json(body): Json<ProgressUpdateRequest>,
) -> Result<StatusCode, ApiError> {
    let conn = db::try_lock(&state.db)?;
    require_chapter(&conn, course_id, chapter_id)?;

    db::chapters::upsert_progress(&conn, auth.user_id, chapter_id, body.is_completed)?;
    Ok(StatusCode::NO_CONTENT)
}
