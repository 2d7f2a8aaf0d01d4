//! Auth database operations (users and sessions tables).

use chrono::{Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{User, UserRole};

pub fn create_user(conn: &Connection, username: &str, password_hash: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (username, password_hash, role, created_at) VALUES (?1, ?2, 'student', ?3)",
        params![username, password_hash, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn username_taken(conn: &Connection, username: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE username = ?1 COLLATE NOCASE",
        params![username],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Look up a user for login, returns (user_id, password_hash)
pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<(i64, String)>> {
    conn.query_row(
        "SELECT id, password_hash FROM users WHERE username = ?1 COLLATE NOCASE",
        params![username],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

pub fn get_user(conn: &Connection, user_id: i64) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, COALESCE(role, 'student'), created_at FROM users WHERE id = ?1",
        params![user_id],
        |row| {
            let username: String = row.get(1)?;
            let role: String = row.get(2)?;
            Ok(User {
                id: row.get(0)?,
                role: resolve_role(&username, &role),
                username,
                created_at: row.get(3)?,
            })
        },
    )
    .optional()
}

/// Resolve the effective role. The reserved 'admin' username is always an
/// admin regardless of the stored role.
fn resolve_role(username: &str, stored: &str) -> UserRole {
    if username.eq_ignore_ascii_case("admin") {
        UserRole::Admin
    } else {
        UserRole::from_str(stored)
    }
}

pub fn set_user_role(conn: &Connection, user_id: i64, role: UserRole) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET role = ?1 WHERE id = ?2",
        params![role.as_str(), user_id],
    )?;
    Ok(updated > 0)
}

pub fn update_last_login(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET last_login_at = ?1 WHERE id = ?2",
        params![Utc::now().to_rfc3339(), user_id],
    )?;
    Ok(())
}

pub fn count_users(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}

// ==================== Sessions ====================

pub fn create_session(
    conn: &Connection,
    user_id: i64,
    session_id: &str,
    duration_hours: i64,
) -> Result<()> {
    let now = Utc::now();
    let expires = now + Duration::hours(duration_hours);
    conn.execute(
        "INSERT INTO sessions (id, user_id, created_at, expires_at, last_access_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            session_id,
            user_id,
            now.to_rfc3339(),
            expires.to_rfc3339(),
            now.to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Validate a session and return the user, touching last access time.
pub fn get_session_user(conn: &Connection, session_id: &str) -> Result<Option<User>> {
    let now = Utc::now().to_rfc3339();
    let result = conn
        .query_row(
            r#"
            SELECT u.id, u.username, COALESCE(u.role, 'student'), u.created_at
            FROM sessions s
            JOIN users u ON s.user_id = u.id
            WHERE s.id = ?1 AND s.expires_at > ?2
            "#,
            params![session_id, now],
            |row| {
                let username: String = row.get(1)?;
                let role: String = row.get(2)?;
                Ok(User {
                    id: row.get(0)?,
                    role: resolve_role(&username, &role),
                    username,
                    created_at: row.get(3)?,
                })
            },
        )
        .optional()?;

    if result.is_some() {
        use crate::db::LogOnError;
        conn.execute(
            "UPDATE sessions SET last_access_at = ?1 WHERE id = ?2",
            params![now, session_id],
        )
        .log_warn("failed to touch session");
    }

    Ok(result)
}

/// Delete a session (logout)
pub fn delete_session(conn: &Connection, session_id: &str) -> Result<()> {
    conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id])?;
    Ok(())
}

/// Remove expired sessions
pub fn cleanup_expired_sessions(conn: &Connection) -> Result<usize> {
    conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        params![Utc::now().to_rfc3339()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_test_db;

    #[test]
    fn test_user_roundtrip() {
        let conn = open_test_db();
        let id = create_user(&conn, "alice", "hash").unwrap();

        assert!(username_taken(&conn, "alice").unwrap());
        assert!(username_taken(&conn, "ALICE").unwrap());
        assert!(!username_taken(&conn, "bob").unwrap());

        let (found_id, hash) = get_user_by_username(&conn, "alice").unwrap().unwrap();
        assert_eq!(found_id, id);
        assert_eq!(hash, "hash");

        let user = get_user(&conn, id).unwrap().unwrap();
        assert_eq!(user.role, UserRole::Student);
    }

    #[test]
    fn test_admin_username_is_always_admin() {
        let conn = open_test_db();
        let id = create_user(&conn, "admin", "hash").unwrap();
        let user = get_user(&conn, id).unwrap().unwrap();
        assert_eq!(user.role, UserRole::Admin);
    }

    #[test]
    fn test_set_role() {
        let conn = open_test_db();
        let id = create_user(&conn, "alice", "hash").unwrap();

        assert!(set_user_role(&conn, id, UserRole::Teacher).unwrap());
        let user = get_user(&conn, id).unwrap().unwrap();
        assert_eq!(user.role, UserRole::Teacher);

        // Unknown user updates nothing
        assert!(!set_user_role(&conn, 999, UserRole::Teacher).unwrap());
    }

    #[test]
    fn test_session_lifecycle() {
        let conn = open_test_db();
        let id = create_user(&conn, "alice", "hash").unwrap();

        create_session(&conn, id, "session-1", 24).unwrap();
        let user = get_session_user(&conn, "session-1").unwrap().unwrap();
        assert_eq!(user.id, id);

        assert!(get_session_user(&conn, "missing").unwrap().is_none());

        delete_session(&conn, "session-1").unwrap();
        assert!(get_session_user(&conn, "session-1").unwrap().is_none());
    }

    #[test]
    fn test_expired_session_rejected() {
        let conn = open_test_db();
        let id = create_user(&conn, "alice", "hash").unwrap();

        create_session(&conn, id, "stale", -1).unwrap();
        assert!(get_session_user(&conn, "stale").unwrap().is_none());
        assert_eq!(cleanup_expired_sessions(&conn).unwrap(), 1);
    }
}
