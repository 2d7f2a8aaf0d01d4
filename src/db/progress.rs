//! Progress queries: the bulk reads feeding assessment::progress.
//!
//! Quiz completion is resolved with a single query over the full quiz-id
//! set of the course rather than one query per chapter.

use std::collections::HashSet;

use rusqlite::{params, Connection, Result};

use crate::assessment::{self, ChapterQuizzes};

/// Published chapters of a course in position order, each with its
/// published quiz ids.
pub fn published_chapters_with_quizzes(
    conn: &Connection,
    course_id: i64,
) -> Result<Vec<ChapterQuizzes>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM chapters
         WHERE course_id = ?1 AND is_published = 1
         ORDER BY position",
    )?;
    let mut chapters = stmt
        .query_map(params![course_id], |row| {
            Ok(ChapterQuizzes {
                chapter_id: row.get(0)?,
                quiz_ids: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    let mut stmt = conn.prepare(
        "SELECT q.id, q.chapter_id
         FROM quizzes q
         JOIN chapters c ON q.chapter_id = c.id
         WHERE c.course_id = ?1 AND c.is_published = 1 AND q.is_published = 1",
    )?;
    let quiz_rows = stmt
        .query_map(params![course_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<Vec<_>>>()?;

    for (quiz_id, chapter_id) in quiz_rows {
        if let Some(chapter) = chapters.iter_mut().find(|c| c.chapter_id == chapter_id) {
            chapter.quiz_ids.push(quiz_id);
        }
    }

    Ok(chapters)
}

/// Chapter ids of the course with a completed video-progress row for the
/// user, restricted to published chapters.
pub fn completed_chapter_ids(
    conn: &Connection,
    user_id: i64,
    course_id: i64,
) -> Result<HashSet<i64>> {
    let mut stmt = conn.prepare(
        "SELECT p.chapter_id
         FROM user_progress p
         JOIN chapters c ON p.chapter_id = c.id
         WHERE p.user_id = ?1 AND p.is_completed = 1
           AND c.course_id = ?2 AND c.is_published = 1",
    )?;
    let ids = stmt
        .query_map(params![user_id, course_id], |row| row.get(0))?
        .collect::<Result<HashSet<i64>>>()?;
    Ok(ids)
}

/// Distinct quiz ids among `quiz_ids` for which the user holds at least one
/// passed attempt. One batched query for the whole id set.
pub fn passed_quiz_ids(
    conn: &Connection,
    user_id: i64,
    quiz_ids: &[i64],
) -> Result<HashSet<i64>> {
    if quiz_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let id_list = quiz_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let mut stmt = conn.prepare(&format!(
        "SELECT DISTINCT quiz_id FROM quiz_attempts
         WHERE user_id = ?1 AND passed = 1 AND quiz_id IN ({})",
        id_list
    ))?;
    let ids = stmt
        .query_map(params![user_id], |row| row.get(0))?
        .collect::<Result<HashSet<i64>>>()?;
    Ok(ids)
}

/// Compute the user's progress percentage for a course.
///
/// Returns an error when the store fails; a 0.0 result always means "no
/// progress", never "computation failed".
pub fn course_progress_for_user(conn: &Connection, user_id: i64, course_id: i64) -> Result<f64> {
    let chapters = published_chapters_with_quizzes(conn, course_id)?;
    let completed = completed_chapter_ids(conn, user_id, course_id)?;

    let all_quiz_ids: Vec<i64> = chapters
        .iter()
        .flat_map(|c| c.quiz_ids.iter().copied())
        .collect();
    let passed = passed_quiz_ids(conn, user_id, &all_quiz_ids)?;

    Ok(assessment::course_progress(&chapters, &completed, &passed))
}
