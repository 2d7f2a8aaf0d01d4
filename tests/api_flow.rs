//! End-to-end API tests: authoring, enrollment, progress, and grading.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use learnhall::db;
use learnhall::router;
use learnhall::state::AppState;

fn test_server() -> (TempDir, TestServer) {
    let temp = TempDir::new().unwrap();
    let pool = db::init_db(&temp.path().join("learnhall.db")).unwrap();
    let server = TestServer::builder()
        .save_cookies()
        .build(router(AppState::new(pool)))
        .unwrap();
    (temp, server)
}

async fn register(server: &TestServer, username: &str) {
    let response = server
        .post("/register")
        .json(&json!({ "username": username, "password": "correct horse battery" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

/// Create a published course with two published chapters; the first chapter
/// carries a published two-question quiz (passing score 50). Returns
/// (course, chapter_with_quiz, chapter_without_quiz, quiz, correct option
/// per question, wrong option per question).
async fn seed_course(server: &TestServer) -> (i64, i64, i64, i64, Vec<(i64, i64, i64)>) {
    let response = server
        .post("/api/courses")
        .json(&json!({ "title": "Rust from scratch" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let course_id = response.json::<Value>()["id"].as_i64().unwrap();

    let mut chapter_ids = Vec::new();
    for title in ["Ownership", "Borrowing"] {
        let response = server
            .post(&format!("/api/courses/{course_id}/chapters"))
            .json(&json!({ "title": title }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        chapter_ids.push(response.json::<Value>()["id"].as_i64().unwrap());
    }

    let response = server
        .post(&format!(
            "/api/courses/{course_id}/chapters/{}/quizzes",
            chapter_ids[0]
        ))
        .json(&json!({ "title": "Ownership check", "passing_score": 50 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let quiz_id = response.json::<Value>()["id"].as_i64().unwrap();

    // Two one-point questions; remember (question, correct option, wrong option)
    let mut questions = Vec::new();
    for prompt in ["What moves?", "What borrows?"] {
        let response = server
            .post(&format!(
                "/api/courses/{course_id}/chapters/{}/quizzes/{quiz_id}/questions",
                chapter_ids[0]
            ))
            .json(&json!({
                "prompt": prompt,
                "options": [
                    { "text": "right", "is_correct": true },
                    { "text": "wrong" },
                ],
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let question = response.json::<Value>();
        let question_id = question["id"].as_i64().unwrap();
        let options = question["options"].as_array().unwrap();
        questions.push((
            question_id,
            options[0]["id"].as_i64().unwrap(),
            options[1]["id"].as_i64().unwrap(),
        ));
    }

    // Publish everything
    for chapter_id in &chapter_ids {
        let response = server
            .patch(&format!("/api/courses/{course_id}/chapters/{chapter_id}"))
            .json(&json!({ "is_published": true }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
    let response = server
        .patch(&format!(
            "/api/courses/{course_id}/chapters/{}/quizzes/{quiz_id}",
            chapter_ids[0]
        ))
        .json(&json!({ "is_published": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let response = server
        .patch(&format!("/api/courses/{course_id}"))
        .json(&json!({ "is_published": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    (course_id, chapter_ids[0], chapter_ids[1], quiz_id, questions)
}

#[tokio::test]
async fn test_requests_without_session_are_unauthorized() {
    let (_temp, server) = test_server();

    let response = server.get("/api/courses").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server.get("/api/dashboard").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_students_cannot_author_courses() {
    let (_temp, mut server) = test_server();
    register(&server, "student1").await;

    let response = server
        .post("/api/courses")
        .json(&json!({ "title": "Nope" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_roundtrip() {
    let (_temp, mut server) = test_server();
    register(&server, "alice").await;

    // Duplicate username is rejected
    let response = server
        .post("/register")
        .json(&json!({ "username": "alice", "password": "correct horse battery" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    server.clear_cookies();
    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "correct horse battery" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["role"], "student");
}

#[tokio::test]
async fn test_enrollment_and_catalog() {
    let (_temp, mut server) = test_server();
    register(&server, "admin").await;
    let (course_id, ..) = seed_course(&server).await;

    server.clear_cookies();
    register(&server, "student1").await;

    let response = server.get("/api/courses").await;
    let catalog = response.json::<Vec<Value>>();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0]["enrolled"], false);
    assert!(catalog[0]["progress"].is_null());

    let response = server.post(&format!("/api/courses/{course_id}/enroll")).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    // Enrolling twice conflicts
    let response = server.post(&format!("/api/courses/{course_id}/enroll")).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = server.get("/api/courses").await;
    let catalog = response.json::<Vec<Value>>();
    assert_eq!(catalog[0]["enrolled"], true);
    assert_eq!(catalog[0]["progress"], 0.0);

    // Unknown course 404s
    let response = server.post("/api/courses/999/enroll").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_progress_and_grading_flow() {
    let (_temp, mut server) = test_server();
    register(&server, "admin").await;
    let (course_id, quiz_chapter, plain_chapter, quiz_id, questions) = seed_course(&server).await;

    server.clear_cookies();
    register(&server, "learner").await;
    server.post(&format!("/api/courses/{course_id}/enroll")).await;

    let progress_url = format!("/api/courses/{course_id}/progress");
    let response = server.get(&progress_url).await;
    assert_eq!(response.json::<Value>()["progress"], 0.0);

    // Watching the quiz-free chapter completes half the course
    let response = server
        .put(&format!(
            "/api/courses/{course_id}/chapters/{plain_chapter}/progress"
        ))
        .json(&json!({ "is_completed": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server.get(&progress_url).await;
    assert_eq!(response.json::<Value>()["progress"], 50.0);

    // The quiz chapter needs both video and a passed quiz
    server
        .put(&format!(
            "/api/courses/{course_id}/chapters/{quiz_chapter}/progress"
        ))
        .json(&json!({ "is_completed": true }))
        .await;
    let response = server.get(&progress_url).await;
    assert_eq!(response.json::<Value>()["progress"], 50.0);

    // One of two correct: 50.0 meets the passing score of 50
    let submit_url = format!(
        "/api/courses/{course_id}/chapters/{quiz_chapter}/quizzes/{quiz_id}/submit"
    );
    let response = server
        .post(&submit_url)
        .json(&json!({ "answers": {
            (questions[0].0.to_string()): questions[0].1,
            (questions[1].0.to_string()): questions[1].2,
        }}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let result = response.json::<Value>();
    assert_eq!(result["score"], 50.0);
    assert_eq!(result["passed"], true);
    assert_eq!(result["total_points"], 2);
    assert_eq!(result["earned_points"], 1);
    assert_eq!(result["answers"].as_array().unwrap().len(), 2);

    let response = server.get(&progress_url).await;
    assert_eq!(response.json::<Value>()["progress"], 100.0);

    // A later failing retake creates a new attempt and cannot lower progress
    let response = server
        .post(&submit_url)
        .json(&json!({ "answers": {} }))
        .await;
    let retake = response.json::<Value>();
    assert_eq!(retake["score"], 0.0);
    assert_eq!(retake["passed"], false);
    assert_ne!(retake["attempt_id"], result["attempt_id"]);

    let response = server.get(&progress_url).await;
    assert_eq!(response.json::<Value>()["progress"], 100.0);

    // History holds both attempts, newest first
    let response = server
        .get(&format!(
            "/api/courses/{course_id}/chapters/{quiz_chapter}/quizzes/{quiz_id}/attempts"
        ))
        .await;
    let history = response.json::<Vec<Value>>();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["score"], 0.0);
    assert_eq!(history[1]["score"], 50.0);
    assert_eq!(history[1]["answers"].as_array().unwrap().len(), 2);

    // Student dashboard reflects the enrolled course
    let response = server.get("/api/dashboard").await;
    let dashboard = response.json::<Value>();
    assert_eq!(dashboard["role"], "student");
    assert_eq!(dashboard["courses"][0]["progress"], 100.0);
}

#[tokio::test]
async fn test_role_management_and_teacher_dashboard() {
    let (_temp, mut server) = test_server();
    register(&server, "admin").await;

    server.clear_cookies();
    register(&server, "mentor").await;
    let mentor_id = server
        .post("/login")
        .json(&json!({ "username": "mentor", "password": "correct horse battery" }))
        .await
        .json::<Value>()["id"]
        .as_i64()
        .unwrap();

    // Students cannot change roles
    let response = server
        .put(&format!("/api/users/{mentor_id}/role"))
        .json(&json!({ "role": "teacher" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    server.clear_cookies();
    server
        .post("/login")
        .json(&json!({ "username": "admin", "password": "correct horse battery" }))
        .await;
    let response = server
        .put(&format!("/api/users/{mentor_id}/role"))
        .json(&json!({ "role": "teacher" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["role"], "teacher");

    // The promoted teacher can author and sees their course on the dashboard
    server.clear_cookies();
    server
        .post("/login")
        .json(&json!({ "username": "mentor", "password": "correct horse battery" }))
        .await;
    let response = server
        .post("/api/courses")
        .json(&json!({ "title": "Lifetimes" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = server.get("/api/dashboard").await;
    let dashboard = response.json::<Value>();
    assert_eq!(dashboard["role"], "teacher");
    assert_eq!(dashboard["courses"][0]["enrolled_students"], 0);

    // Admin dashboard reports totals
    server.clear_cookies();
    server
        .post("/login")
        .json(&json!({ "username": "admin", "password": "correct horse battery" }))
        .await;
    let response = server.get("/api/dashboard").await;
    let dashboard = response.json::<Value>();
    assert_eq!(dashboard["role"], "admin");
    assert_eq!(dashboard["totals"]["users"], 2);
    assert_eq!(dashboard["totals"]["courses"], 1);
}

#[tokio::test]
async fn test_logout_closes_the_session() {
    let (_temp, mut server) = test_server();
    register(&server, "alice").await;

    let response = server.get("/api/dashboard").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server.post("/logout").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server.get("/api/dashboard").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
