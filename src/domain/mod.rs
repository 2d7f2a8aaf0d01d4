pub mod attempt;
pub mod course;
pub mod quiz;
pub mod user;

pub use attempt::{AttemptResult, AttemptWithAnswers, QuizAnswer, QuizAttempt};
pub use course::{Chapter, Course};
pub use quiz::{Question, QuestionOption, Quiz};
pub use user::{User, UserRole};
