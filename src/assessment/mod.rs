pub mod grading;
pub mod progress;

pub use grading::{grade, GradedSubmission};
pub use progress::{course_progress, ChapterQuizzes};
