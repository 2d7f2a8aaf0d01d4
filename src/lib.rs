pub mod assessment;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/register", post(auth::handlers::register))
    .route("/login", post(auth::handlers::login))
    .route("/logout", post(auth::handlers::logout))
    .route("/api/dashboard", get(handlers::dashboard::dashboard))
    .route("/api/users/{user_id}/role", put(auth::handlers::set_role))
    .route(
      "/api/courses",
      get(handlers::courses::list_courses).post(handlers::courses::create_course),
    )
    .route("/api/courses/{course_id}", patch(handlers::courses::update_course))
    .route("/api/courses/{course_id}/enroll", post(handlers::courses::enroll))
    .route("/api/courses/{course_id}/progress", get(handlers::courses::course_progress))
    .route(
      "/api/courses/{course_id}/chapters",
      post(handlers::chapters::create_chapter),
    )
    .route(
      "/api/courses/{course_id}/chapters/{chapter_id}",
      patch(handlers::chapters::update_chapter),
    )
    .route(
      "/api/courses/{course_id}/chapters/{chapter_id}/progress",
      put(handlers::chapters::update_progress),
    )
    .route(
      "/api/courses/{course_id}/chapters/{chapter_id}/quizzes",
      get(handlers::quizzes::list_quizzes).post(handlers::quizzes::create_quiz),
    )
    .route(
      "/api/courses/{course_id}/chapters/{chapter_id}/quizzes/{quiz_id}",
      patch(handlers::quizzes::update_quiz),
    )
    .route(
      "/api/courses/{course_id}/chapters/{chapter_id}/quizzes/{quiz_id}/questions",
      post(handlers::quizzes::create_question),
    )
    .route(
      "/api/courses/{course_id}/chapters/{chapter_id}/quizzes/{quiz_id}/submit",
      post(handlers::attempts::submit_quiz),
    )
    .route(
      "/api/courses/{course_id}/chapters/{chapter_id}/quizzes/{quiz_id}/attempts",
      get(handlers::attempts::list_attempts),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
