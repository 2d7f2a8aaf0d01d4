//! Quiz attempt persistence.
//!
//! An attempt and its answers are written in one transaction with the final
//! score already computed, so no partially-graded attempt is ever visible.
//! Attempts are immutable after commit; retakes insert new rows.

use chrono::Utc;
use rusqlite::{params, Connection, Result};

use crate::assessment::GradedSubmission;
use crate::domain::{AttemptWithAnswers, QuizAnswer, QuizAttempt};

/// Commit a graded submission as a new attempt with its answer rows.
pub fn record_attempt(
    conn: &Connection,
    user_id: i64,
    quiz_id: i64,
    graded: &GradedSubmission,
) -> Result<QuizAttempt> {
    let now = Utc::now().to_rfc3339();
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO quiz_attempts (user_id, quiz_id, score, passed, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![user_id, quiz_id, graded.score, graded.passed as i64, now],
    )?;
    let attempt_id = tx.last_insert_rowid();

    for answer in &graded.answers {
        tx.execute(
            "INSERT INTO quiz_answers (attempt_id, question_id, option_id, is_correct)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                attempt_id,
                answer.question_id,
                answer.option_id,
                answer.is_correct as i64
            ],
        )?;
    }

    tx.commit()?;
    Ok(QuizAttempt {
        id: attempt_id,
        user_id,
        quiz_id,
        score: graded.score,
        passed: graded.passed,
        created_at: now,
    })
}

/// Attempt history for a user and quiz, newest first, each with its answers.
pub fn list_attempts(
    conn: &Connection,
    user_id: i64,
    quiz_id: i64,
) -> Result<Vec<AttemptWithAnswers>> {
    let mut stmt = conn.prepare(
        "SELECT id, score, passed, created_at
         FROM quiz_attempts
         WHERE user_id = ?1 AND quiz_id = ?2
         ORDER BY created_at DESC, id DESC",
    )?;
    let mut attempts = stmt
        .query_map(params![user_id, quiz_id], |row| {
            Ok(AttemptWithAnswers {
                id: row.get(0)?,
                score: row.get(1)?,
                passed: row.get::<_, i64>(2)? == 1,
                created_at: row.get(3)?,
                answers: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    if attempts.is_empty() {
        return Ok(attempts);
    }

    // One batched query for the answers of every attempt in the history
    let id_list = attempts
        .iter()
        .map(|a| a.id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let mut stmt = conn.prepare(&format!(
        "SELECT attempt_id, question_id, option_id, is_correct
         FROM quiz_answers
         WHERE attempt_id IN ({})
         ORDER BY id",
        id_list
    ))?;
    let answers = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                QuizAnswer {
                    question_id: row.get(1)?,
                    option_id: row.get(2)?,
                    is_correct: row.get::<_, i64>(3)? == 1,
                },
            ))
        })?
        .collect::<Result<Vec<_>>>()?;

    for (attempt_id, answer) in answers {
        if let Some(attempt) = attempts.iter_mut().find(|a| a.id == attempt_id) {
            attempt.answers.push(answer);
        }
    }

    Ok(attempts)
}

pub fn count_attempts(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM quiz_attempts", [], |row| row.get(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_test_db;
    use crate::db::quizzes::{self, NewOption};

    fn seed_quiz(conn: &Connection) -> i64 {
        conn.execute(
            "INSERT INTO users (username, password_hash, role, created_at) VALUES ('s', 'x', 'student', '')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO courses (owner_id, title, is_published, created_at) VALUES (1, 'c', 1, '')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO chapters (course_id, title, position, is_published) VALUES (1, 'ch', 0, 1)",
            [],
        )
        .unwrap();
        let quiz = quizzes::create_quiz(conn, 1, "quiz", None, 70).unwrap();
        quizzes::create_question(conn, quiz.id, "q1", 1, None, &[
            NewOption { text: "a", is_correct: true },
            NewOption { text: "b", is_correct: false },
        ])
        .unwrap();
        quiz.id
    }

    fn graded(score: f64, passed: bool, answers: Vec<QuizAnswer>) -> GradedSubmission {
        let earned = answers.iter().filter(|a| a.is_correct).count() as i64;
        GradedSubmission {
            score,
            passed,
            total_points: answers.len() as i64,
            earned_points: earned,
            answers,
        }
    }

    #[test]
    fn test_attempt_and_answers_written_together() {
        let conn = open_test_db();
        let quiz_id = seed_quiz(&conn);

        let submission = graded(100.0, true, vec![QuizAnswer {
            question_id: 1,
            option_id: 1,
            is_correct: true,
        }]);
        let attempt = record_attempt(&conn, 1, quiz_id, &submission).unwrap();

        assert!(attempt.passed);
        let answer_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM quiz_answers WHERE attempt_id = ?1",
                params![attempt.id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(answer_count, 1);
    }

    #[test]
    fn test_retakes_create_distinct_attempts() {
        let conn = open_test_db();
        let quiz_id = seed_quiz(&conn);

        let submission = graded(0.0, false, vec![]);
        let first = record_attempt(&conn, 1, quiz_id, &submission).unwrap();
        let second = record_attempt(&conn, 1, quiz_id, &submission).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.score, second.score);

        let history = list_attempts(&conn, 1, quiz_id).unwrap();
        assert_eq!(history.len(), 2);
        // Newest first
        assert_eq!(history[0].id, second.id);
    }

    #[test]
    fn test_history_includes_answers() {
        let conn = open_test_db();
        let quiz_id = seed_quiz(&conn);

        let submission = graded(0.0, false, vec![QuizAnswer {
            question_id: 1,
            option_id: 2,
            is_correct: false,
        }]);
        record_attempt(&conn, 1, quiz_id, &submission).unwrap();

        let history = list_attempts(&conn, 1, quiz_id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].answers, vec![QuizAnswer {
            question_id: 1,
            option_id: 2,
            is_correct: false,
        }]);
    }

    #[test]
    fn test_empty_history() {
        let conn = open_test_db();
        let quiz_id = seed_quiz(&conn);
        assert!(list_attempts(&conn, 1, quiz_id).unwrap().is_empty());
    }
}
