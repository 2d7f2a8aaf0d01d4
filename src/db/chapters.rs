//! Chapter queries and video-progress tracking.
//!
//! user_progress rows record video-watch completion only; quiz completion
//! lives in quiz_attempts and the two are combined by db::progress.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::Chapter;

fn chapter_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chapter> {
    Ok(Chapter {
        id: row.get(0)?,
        course_id: row.get(1)?,
        title: row.get(2)?,
        position: row.get(3)?,
        is_published: row.get::<_, i64>(4)? == 1,
        is_free: row.get::<_, i64>(5)? == 1,
    })
}

const CHAPTER_COLS: &str = "id, course_id, title, position, is_published, is_free";

/// Create a chapter at the end of the course (last position + 1).
pub fn create_chapter(conn: &Connection, course_id: i64, title: &str) -> Result<Chapter> {
    let last_position: Option<i64> = conn
        .query_row(
            "SELECT MAX(position) FROM chapters WHERE course_id = ?1",
            params![course_id],
            |row| row.get(0),
        )
        .optional()?
        .flatten();
    let position = last_position.map(|p| p + 1).unwrap_or(0);

    conn.execute(
        "INSERT INTO chapters (course_id, title, position, is_published, is_free)
         VALUES (?1, ?2, ?3, 0, 0)",
        params![course_id, title, position],
    )?;
    Ok(Chapter {
        id: conn.last_insert_rowid(),
        course_id,
        title: title.to_string(),
        position,
        is_published: false,
        is_free: false,
    })
}

pub fn get_chapter(conn: &Connection, chapter_id: i64) -> Result<Option<Chapter>> {
    conn.query_row(
        &format!("SELECT {} FROM chapters WHERE id = ?1", CHAPTER_COLS),
        params![chapter_id],
        chapter_from_row,
    )
    .optional()
}

pub fn set_chapter_published(conn: &Connection, chapter_id: i64, published: bool) -> Result<()> {
    conn.execute(
        "UPDATE chapters SET is_published = ?1 WHERE id = ?2",
        params![published as i64, chapter_id],
    )?;
    Ok(())
}

pub fn set_chapter_free(conn: &Connection, chapter_id: i64, free: bool) -> Result<()> {
    conn.execute(
        "UPDATE chapters SET is_free = ?1 WHERE id = ?2",
        params![free as i64, chapter_id],
    )?;
    Ok(())
}

/// Record video-watch completion for a chapter. Called when the player
/// reports the completion event; upserts the (user, chapter) row.
pub fn upsert_progress(
    conn: &Connection,
    user_id: i64,
    chapter_id: i64,
    is_completed: bool,
) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"INSERT INTO user_progress (user_id, chapter_id, is_completed, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(user_id, chapter_id) DO UPDATE SET is_completed = ?3, updated_at = ?4"#,
        params![user_id, chapter_id, is_completed as i64, now],
    )?;
    Ok(())
}
