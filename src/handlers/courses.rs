//! Course handlers: catalog, authoring, enrollment, and progress.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::require_course;
use crate::auth::AuthContext;
use crate::db;
use crate::domain::Course;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCourseRequest {
    pub is_published: bool,
}

/// A catalog entry: the course plus the caller's relationship to it.
#[derive(Serialize)]
pub struct CourseSummary {
    #[serde(flatten)]
    pub course: Course,
    pub enrolled: bool,
    /// Progress percentage; present only for enrolled courses
    pub progress: Option<f64>,
}

#[derive(Serialize)]
pub struct ProgressResponse {
    pub progress: f64,
}

/// GET /api/courses - Published catalog with the caller's enrollment state
pub async fn list_courses(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<CourseSummary>>, ApiError> {
    let conn = db::try_lock(&state.db)?;
    let courses = db::courses::list_published_courses(&conn)?;

    let mut summaries = Vec::with_capacity(courses.len());
    for course in courses {
        let enrolled = db::courses::is_enrolled(&conn, auth.user_id, course.id)?;
        let progress = if enrolled {
            Some(db::progress::course_progress_for_user(
                &conn,
                auth.user_id,
                course.id,
            )?)
        } else {
            None
        };
        summaries.push(CourseSummary { course, enrolled, progress });
    }

    Ok(Json(summaries))
}

/// POST /api/courses - Create a course (teacher or admin)
pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(body): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !auth.role.can_author() {
        return Err(ApiError::Unauthorized);
    }
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let conn = db::try_lock(&state.db)?;
    let course = db::courses::create_course(
        &conn,
        auth.user_id,
        body.title.trim(),
        body.description.as_deref(),
    )?;
    tracing::info!("user {} created course {}", auth.user_id, course.id);
    Ok((StatusCode::CREATED, Json(course)))
}

/// PATCH /api/courses/{course_id} - Publish or unpublish (owner or admin)
pub async fn update_course(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(course_id): Path<i64>,
    Json(body): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, ApiError> {
    let conn = db::try_lock(&state.db)?;
    let course = require_course(&conn, course_id)?;
    if !auth.can_edit_course(course.owner_id) {
        return Err(ApiError::Unauthorized);
    }

    db::courses::set_course_published(&conn, course_id, body.is_published)?;
    let course = require_course(&conn, course_id)?;
    Ok(Json(course))
}

/// POST /api/courses/{course_id}/enroll - Enroll in a published course
pub async fn enroll(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let conn = db::try_lock(&state.db)?;

    let course = db::courses::get_published_course(&conn, course_id)?
        .ok_or(ApiError::NotFound("course"))?;
    if db::courses::is_enrolled(&conn, auth.user_id, course.id)? {
        return Err(ApiError::Conflict("already enrolled"));
    }

    db::courses::enroll(&conn, auth.user_id, course.id)?;
    tracing::info!("user {} enrolled in course {}", auth.user_id, course.id);
    Ok(StatusCode::CREATED)
}

/// GET /api/courses/{course_id}/progress - Progress percentage
pub async fn course_progress(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(course_id): Path<i64>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let conn = db::try_lock(&state.db)?;
    require_course(&conn, course_id)?;

    let progress = db::progress::course_progress_for_user(&conn, auth.user_id, course_id)?;
    Ok(Json(ProgressResponse { progress }))
}
