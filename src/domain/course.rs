use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Course {
  pub id: i64,
  pub owner_id: i64,
  pub title: String,
  pub description: Option<String>,
  pub is_published: bool,
  pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Chapter {
  pub id: i64,
  pub course_id: i64,
  pub title: String,
  pub position: i64,
  pub is_published: bool,
  /// Free chapters are viewable without enrollment (course preview)
  pub is_free: bool,
}
