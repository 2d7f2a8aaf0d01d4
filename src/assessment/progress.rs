//! Course progress: the fraction of published chapters a learner has fully
//! completed.
//!
//! A chapter is fully complete when its video has been watched AND every
//! published quiz in it has at least one passed attempt. The sets this
//! operates on are fetched in bulk by db::progress; the arithmetic here is
//! pure and side-effect free.

use std::collections::HashSet;

/// A published chapter together with its published quiz ids.
#[derive(Debug, Clone)]
pub struct ChapterQuizzes {
  pub chapter_id: i64,
  pub quiz_ids: Vec<i64>,
}

/// True if the chapter counts as fully complete: video watched, and every
/// published quiz passed. A chapter with no quizzes is complete on video
/// alone.
pub fn is_chapter_complete(
  chapter: &ChapterQuizzes,
  completed_videos: &HashSet<i64>,
  passed_quizzes: &HashSet<i64>,
) -> bool {
  if !completed_videos.contains(&chapter.chapter_id) {
    return false;
  }
  chapter.quiz_ids.iter().all(|id| passed_quizzes.contains(id))
}

/// Percentage of published chapters fully completed, in [0, 100].
///
/// A course with no published chapters yields 0.0. The naive division would
/// produce NaN here; callers rely on a defined value.
pub fn course_progress(
  chapters: &[ChapterQuizzes],
  completed_videos: &HashSet<i64>,
  passed_quizzes: &HashSet<i64>,
) -> f64 {
  if chapters.is_empty() {
    return 0.0;
  }

  let completed = chapters
    .iter()
    .filter(|c| is_chapter_complete(c, completed_videos, passed_quizzes))
    .count();

  (completed as f64 / chapters.len() as f64) * 100.0
}
