//! Course and enrollment queries.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::Course;

fn course_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        is_published: row.get::<_, i64>(4)? == 1,
        created_at: row.get(5)?,
    })
}

const COURSE_COLS: &str = "id, owner_id, title, description, is_published, created_at";

pub fn create_course(
    conn: &Connection,
    owner_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Course> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO courses (owner_id, title, description, is_published, created_at)
         VALUES (?1, ?2, ?3, 0, ?4)",
        params![owner_id, title, description, now],
    )?;
    Ok(Course {
        id: conn.last_insert_rowid(),
        owner_id,
        title: title.to_string(),
        description: description.map(|s| s.to_string()),
        is_published: false,
        created_at: now,
    })
}

pub fn get_course(conn: &Connection, course_id: i64) -> Result<Option<Course>> {
    conn.query_row(
        &format!("SELECT {} FROM courses WHERE id = ?1", COURSE_COLS),
        params![course_id],
        course_from_row,
    )
    .optional()
}

pub fn get_published_course(conn: &Connection, course_id: i64) -> Result<Option<Course>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM courses WHERE id = ?1 AND is_published = 1",
            COURSE_COLS
        ),
        params![course_id],
        course_from_row,
    )
    .optional()
}

pub fn list_published_courses(conn: &Connection) -> Result<Vec<Course>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM courses WHERE is_published = 1 ORDER BY created_at DESC",
        COURSE_COLS
    ))?;
    let courses = stmt
        .query_map([], course_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(courses)
}

pub fn list_courses_by_owner(conn: &Connection, owner_id: i64) -> Result<Vec<Course>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM courses WHERE owner_id = ?1 ORDER BY created_at DESC",
        COURSE_COLS
    ))?;
    let courses = stmt
        .query_map(params![owner_id], course_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(courses)
}

pub fn set_course_published(conn: &Connection, course_id: i64, published: bool) -> Result<()> {
    conn.execute(
        "UPDATE courses SET is_published = ?1 WHERE id = ?2",
        params![published as i64, course_id],
    )?;
    Ok(())
}

// ==================== Enrollment ====================

pub fn is_enrolled(conn: &Connection, user_id: i64, course_id: i64) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM enrollments WHERE user_id = ?1 AND course_id = ?2",
        params![user_id, course_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn enroll(conn: &Connection, user_id: i64, course_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO enrollments (user_id, course_id, created_at) VALUES (?1, ?2, ?3)",
        params![user_id, course_id, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn list_enrolled_courses(conn: &Connection, user_id: i64) -> Result<Vec<Course>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.owner_id, c.title, c.description, c.is_published, c.created_at
         FROM courses c
         JOIN enrollments e ON e.course_id = c.id
         WHERE e.user_id = ?1
         ORDER BY e.created_at DESC",
    )?;
    let courses = stmt
        .query_map(params![user_id], course_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(courses)
}

pub fn enrollment_count(conn: &Connection, course_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM enrollments WHERE course_id = ?1",
        params![course_id],
        |row| row.get(0),
    )
}

pub fn count_courses(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))
}
