//! Authentication extractor.
//!
//! Add `AuthContext` as a handler parameter to require a valid session;
//! requests without one are rejected with 401 before any handler logic runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use super::db as auth_db;
use crate::db;
use crate::domain::UserRole;
use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "learnhall_session";

/// Authenticated request context.
#[derive(Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
}

impl AuthContext {
    /// Authorize an authoring action on a course: the owner or an admin.
    pub fn can_edit_course(&self, owner_id: i64) -> bool {
        self.user_id == owner_id || self.role == UserRole::Admin
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthorized)?;

        let session_id = jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .ok_or(ApiError::Unauthorized)?;

        let conn = db::try_lock(&state.db)?;
        let user = auth_db::get_session_user(&conn, &session_id)?
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthContext {
            user_id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}
