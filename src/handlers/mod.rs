pub mod attempts;
pub mod chapters;
pub mod courses;
pub mod dashboard;
pub mod quizzes;

use rusqlite::Connection;

use crate::db;
use crate::domain::{Chapter, Course, Quiz};
use crate::error::ApiError;

/// Resolve a course by id or 404.
pub(crate) fn require_course(conn: &Connection, course_id: i64) -> Result<Course, ApiError> {
  db::courses::get_course(conn, course_id)?.ok_or(ApiError::NotFound("course"))
}

/// Resolve a chapter and check it belongs to the course in the path.
pub(crate) fn require_chapter(
  conn: &Connection,
  course_id: i64,
  chapter_id: i64,
) -> Result<Chapter, ApiError> {
  let chapter = db::chapters::get_chapter(conn, chapter_id)?.ok_or(ApiError::NotFound("chapter"))?;
  if chapter.course_id != course_id {
    return Err(ApiError::NotFound("chapter"));
  }
  Ok(chapter)
}

/// Resolve a quiz and check it belongs to the chapter in the path.
pub(crate) fn require_quiz(
  conn: &Connection,
  chapter_id: i64,
  quiz_id: i64,
) -> Result<Quiz, ApiError> {
  let quiz = db::quizzes::get_quiz(conn, quiz_id)?.ok_or(ApiError::NotFound("quiz"))?;
  if quiz.chapter_id != chapter_id {
    return Err(ApiError::NotFound("quiz"));
  }
  Ok(quiz)
}
