//! Authentication handlers for register, login, logout, and role changes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use super::db as auth_db;
use super::middleware::{AuthContext, SESSION_COOKIE_NAME};
use super::password;
use crate::config;
use crate::db::{self, LogOnError};
use crate::domain::{User, UserRole};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

/// Usernames: 3-32 characters, alphanumeric and underscore only
fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (3..=32).contains(&len) && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..32)
        .map(|_| {
            let idx = rng.random_range(0..36);
            if idx < 10 {
                (b'0' + idx) as char
            } else {
                (b'a' + idx - 10) as char
            }
        })
        .collect()
}

fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .secure(false) // behind TLS-terminating proxy in production
        .max_age(time::Duration::hours(config::SESSION_DURATION_HOURS))
        .build()
}

/// POST /register - Create an account and log it in
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_valid_username(&body.username) {
        return Err(ApiError::BadRequest(
            "username must be 3-32 characters, letters, digits and underscore".to_string(),
        ));
    }
    if body.password.chars().count() < config::MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {} characters",
            config::MIN_PASSWORD_LENGTH
        )));
    }

    let conn = db::try_lock(&state.db)?;
    if auth_db::username_taken(&conn, &body.username)? {
        return Err(ApiError::Conflict("username already taken"));
    }

    let hash = password::hash_password(&body.password)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))?;
    let user_id = auth_db::create_user(&conn, &body.username, &hash)?;

    let session_id = generate_session_id();
    auth_db::create_session(&conn, user_id, &session_id, config::SESSION_DURATION_HOURS)?;
    let user = auth_db::get_user(&conn, user_id)?.ok_or(ApiError::NotFound("user"))?;

    tracing::info!("registered user {}", user.username);
    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(session_id)),
        Json(user),
    ))
}

/// POST /login - Verify credentials and open a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let conn = db::try_lock(&state.db)?;

    let Some((user_id, stored_hash)) = auth_db::get_user_by_username(&conn, &body.username)?
    else {
        return Err(ApiError::Unauthorized);
    };
    if !password::verify_password(&body.password, &stored_hash) {
        return Err(ApiError::Unauthorized);
    }

    auth_db::update_last_login(&conn, user_id).log_warn("failed to update last login");
    auth_db::cleanup_expired_sessions(&conn).log_warn("failed to clean up sessions");

    let session_id = generate_session_id();
    auth_db::create_session(&conn, user_id, &session_id, config::SESSION_DURATION_HOURS)?;
    let user = auth_db::get_user(&conn, user_id)?.ok_or(ApiError::NotFound("user"))?;

    Ok((jar.add(session_cookie(session_id)), Json(user)))
}

/// POST /logout - Close the current session
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        let conn = db::try_lock(&state.db)?;
        auth_db::delete_session(&conn, cookie.value()).log_warn("failed to delete session");
    }

    let removal = Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build();
    Ok((jar.remove(removal), StatusCode::NO_CONTENT))
}

/// PUT /api/users/{id}/role - Change a user's role (admin only)
pub async fn set_role(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<i64>,
    Json(body): Json<RoleRequest>,
) -> Result<Json<User>, ApiError> {
    if auth.role != UserRole::Admin {
        return Err(ApiError::Unauthorized);
    }

    let role = match body.role.as_str() {
        "student" => UserRole::Student,
        "teacher" => UserRole::Teacher,
        "admin" => UserRole::Admin,
        other => {
            return Err(ApiError::BadRequest(format!("unknown role: {}", other)));
        }
    };

    let conn = db::try_lock(&state.db)?;
    if !auth_db::set_user_role(&conn, user_id, role)? {
        return Err(ApiError::NotFound("user"));
    }
    let user = auth_db::get_user(&conn, user_id)?.ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username("user123"));
        assert!(is_valid_username("my_user"));
        assert!(is_valid_username("a".repeat(32).as_str()));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!is_valid_username("ab")); // too short
        assert!(!is_valid_username(&"a".repeat(33))); // too long
        assert!(!is_valid_username("user name")); // space
        assert!(!is_valid_username("user-name")); // hyphen
        assert!(!is_valid_username("")); // empty
    }

    #[test]
    fn test_session_ids_are_distinct() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
