use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::slide::StoredSlide;

/// A saved presentation owned by one user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub title: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the project list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: String,
    pub topic: String,
    pub slide_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project with its slides, as returned by the detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub slides: Vec<StoredSlide>,
}

/// Rename / re-topic request. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub topic: Option<String>,
}
