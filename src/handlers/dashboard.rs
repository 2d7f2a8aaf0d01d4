//! Role-based dashboard.
//!
//! One endpoint, three payload shapes selected by the caller's role.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::auth::AuthContext;
use crate::db;
use crate::domain::{Course, UserRole};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum DashboardView {
  Student { courses: Vec<EnrolledCourse> },
  Teacher { courses: Vec<AuthoredCourse> },
  Admin { totals: PlatformTotals },
}

#[derive(Serialize)]
pub struct EnrolledCourse {
  #[serde(flatten)]
  pub course: Course,
  pub progress: f64,
}

#[derive(Serialize)]
pub struct AuthoredCourse {
  #[serde(flatten)]
  pub course: Course,
  pub enrolled_students: i64,
}

#[derive(Serialize)]
pub struct PlatformTotals {
  pub users: i64,
  pub courses: i64,
  pub attempts: i64,
}

/// GET /api/dashboard
pub async fn dashboard(
  State(state): State<AppState>,
  auth: AuthContext,
) -> Result<Json<DashboardView>, ApiError> {
  let conn = db::try_lock(&state.db)?;

  let view = match auth.role {
    UserRole::Student => {
      let mut courses = Vec::new();
      for course in db::courses::list_enrolled_courses(&conn, auth.user_id)? {
        let progress = db::progress::course_progress_for_user(&conn, auth.user_id, course.id)?;
        courses.push(EnrolledCourse { course, progress });
      }
      DashboardView::Student { courses }
    }
    UserRole::Teacher => {
      let mut courses = Vec::new();
      for course in db::courses::list_courses_by_owner(&conn, auth.user_id)? {
        let enrolled_students = db::courses::enrollment_count(&conn, course.id)?;
        courses.push(AuthoredCourse { course, enrolled_students });
      }
      DashboardView::Teacher { courses }
    }
    UserRole::Admin => DashboardView::Admin {
      totals: PlatformTotals {
        users: crate::auth::db::count_users(&conn)?,
        courses: db::courses::count_courses(&conn)?,
        attempts: db::attempts::count_attempts(&conn)?,
      },
    },
  };

  Ok(Json(view))
}
