use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  Student,
  Teacher,
  Admin,
}

impl UserRole {
  /// Parse a stored role string. Unknown or legacy values fall back to Student.
  pub fn from_str(s: &str) -> Self {
    match s {
      "teacher" => Self::Teacher,
      "admin" => Self::Admin,
      _ => Self::Student,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Student => "student",
      Self::Teacher => "teacher",
      Self::Admin => "admin",
    }
  }

  /// Teachers and admins may author courses.
  pub fn can_author(&self) -> bool {
    matches!(self, Self::Teacher | Self::Admin)
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub role: UserRole,
  pub created_at: String,
}
