//! Quiz, question, and option queries.
//!
//! Detail loading is batched: one query for questions, one for all their
//! options, joined in memory. Grading and the quiz list endpoint both need
//! full question/option data.

use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{Question, QuestionOption, Quiz};

pub struct NewOption<'a> {
    pub text: &'a str,
    pub is_correct: bool,
}

fn quiz_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Quiz> {
    Ok(Quiz {
        id: row.get(0)?,
        chapter_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        passing_score: row.get(4)?,
        position: row.get(5)?,
        is_published: row.get::<_, i64>(6)? == 1,
    })
}

const QUIZ_COLS: &str = "id, chapter_id, title, description, passing_score, position, is_published";

/// Create a quiz at the end of the chapter (last position + 1).
pub fn create_quiz(
    conn: &Connection,
    chapter_id: i64,
    title: &str,
    description: Option<&str>,
    passing_score: i64,
) -> Result<Quiz> {
    let last_position: Option<i64> = conn
        .query_row(
            "SELECT MAX(position) FROM quizzes WHERE chapter_id = ?1",
            params![chapter_id],
            |row| row.get(0),
        )
        .optional()?
        .flatten();
    let position = last_position.map(|p| p + 1).unwrap_or(0);

    conn.execute(
        "INSERT INTO quizzes (chapter_id, title, description, passing_score, position, is_published)
         VALUES (?1, ?2, ?3, ?4, ?5, 0)",
        params![chapter_id, title, description, passing_score, position],
    )?;
    Ok(Quiz {
        id: conn.last_insert_rowid(),
        chapter_id,
        title: title.to_string(),
        description: description.map(|s| s.to_string()),
        passing_score,
        position,
        is_published: false,
    })
}

pub fn get_quiz(conn: &Connection, quiz_id: i64) -> Result<Option<Quiz>> {
    conn.query_row(
        &format!("SELECT {} FROM quizzes WHERE id = ?1", QUIZ_COLS),
        params![quiz_id],
        quiz_from_row,
    )
    .optional()
}

pub fn set_quiz_published(conn: &Connection, quiz_id: i64, published: bool) -> Result<()> {
    conn.execute(
        "UPDATE quizzes SET is_published = ?1 WHERE id = ?2",
        params![published as i64, quiz_id],
    )?;
    Ok(())
}

/// Create a question with its options at the end of the quiz. The question
/// and option rows are committed together.
pub fn create_question(
    conn: &Connection,
    quiz_id: i64,
    prompt: &str,
    points: i64,
    explanation: Option<&str>,
    options: &[NewOption<'_>],
) -> Result<Question> {
    let tx = conn.unchecked_transaction()?;

    let last_position: Option<i64> = tx
        .query_row(
            "SELECT MAX(position) FROM questions WHERE quiz_id = ?1",
            params![quiz_id],
            |row| row.get(0),
        )
        .optional()?
        .flatten();
    let position = last_position.map(|p| p + 1).unwrap_or(0);

    tx.execute(
        "INSERT INTO questions (quiz_id, prompt, points, explanation, position)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![quiz_id, prompt, points, explanation, position],
    )?;
    let question_id = tx.last_insert_rowid();

    let mut created = Vec::with_capacity(options.len());
    for (index, option) in options.iter().enumerate() {
        tx.execute(
            "INSERT INTO question_options (question_id, option_text, is_correct, position)
             VALUES (?1, ?2, ?3, ?4)",
            params![question_id, option.text, option.is_correct as i64, index as i64],
        )?;
        created.push(QuestionOption {
            id: tx.last_insert_rowid(),
            question_id,
            text: option.text.to_string(),
            is_correct: option.is_correct,
            position: index as i64,
        });
    }

    tx.commit()?;
    Ok(Question {
        id: question_id,
        quiz_id,
        prompt: prompt.to_string(),
        points,
        explanation: explanation.map(|s| s.to_string()),
        position,
        options: created,
    })
}

/// Load the questions of a quiz in quiz order, each with its options.
pub fn quiz_questions(conn: &Connection, quiz_id: i64) -> Result<Vec<Question>> {
    let mut stmt = conn.prepare(
        "SELECT id, quiz_id, prompt, points, explanation, position
         FROM questions WHERE quiz_id = ?1 ORDER BY position",
    )?;
    let mut questions = stmt
        .query_map(params![quiz_id], |row| {
            Ok(Question {
                id: row.get(0)?,
                quiz_id: row.get(1)?,
                prompt: row.get(2)?,
                points: row.get(3)?,
                explanation: row.get(4)?,
                position: row.get(5)?,
                options: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    // One batched query for every option of the quiz
    let mut stmt = conn.prepare(
        "SELECT o.id, o.question_id, o.option_text, o.is_correct, o.position
         FROM question_options o
         JOIN questions q ON o.question_id = q.id
         WHERE q.quiz_id = ?1
         ORDER BY o.question_id, o.position",
    )?;
    let options = stmt
        .query_map(params![quiz_id], |row| {
            Ok(QuestionOption {
                id: row.get(0)?,
                question_id: row.get(1)?,
                text: row.get(2)?,
                is_correct: row.get::<_, i64>(3)? == 1,
                position: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    for option in options {
        if let Some(question) = questions.iter_mut().find(|q| q.id == option.question_id) {
            question.options.push(option);
        }
    }

    Ok(questions)
}

/// Quiz together with its ordered questions and options, or None if the
/// quiz does not exist.
pub fn get_quiz_detail(conn: &Connection, quiz_id: i64) -> Result<Option<(Quiz, Vec<Question>)>> {
    let Some(quiz) = get_quiz(conn, quiz_id)? else {
        return Ok(None);
    };
    let questions = quiz_questions(conn, quiz_id)?;
    Ok(Some((quiz, questions)))
}

/// All quizzes of a chapter in position order, each with questions and
/// options (authoring and player views).
pub fn list_chapter_quizzes(conn: &Connection, chapter_id: i64) -> Result<Vec<(Quiz, Vec<Question>)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM quizzes WHERE chapter_id = ?1 ORDER BY position",
        QUIZ_COLS
    ))?;
    let quizzes = stmt
        .query_map(params![chapter_id], quiz_from_row)?
        .collect::<Result<Vec<_>>>()?;

    quizzes
        .into_iter()
        .map(|quiz| {
            let questions = quiz_questions(conn, quiz.id)?;
            Ok((quiz, questions))
        })
        .collect()
}
