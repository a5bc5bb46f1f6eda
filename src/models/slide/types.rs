use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::deck::{BulletPoint, Slide};

/// A slide row as stored under a project.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredSlide {
    pub id: i64,
    pub project_id: Uuid,
    pub position: i32,
    pub heading: String,
    pub bullet_points: Json<Vec<BulletPoint>>,
    pub key_message: Option<String>,
    pub img_keywords: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredSlide {
    pub fn to_slide(&self) -> Slide {
        Slide {
            heading: self.heading.clone(),
            bullet_points: self.bullet_points.0.clone(),
            key_message: self.key_message.clone(),
            img_keywords: self.img_keywords.clone(),
        }
    }
}

/// Partial update of a slide. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct SlidePatch {
    pub heading: Option<String>,
    pub bullet_points: Option<Vec<BulletPoint>>,
    pub key_message: Option<String>,
    pub img_keywords: Option<String>,
}

impl SlidePatch {
    pub fn is_empty(&self) -> bool {
        self.heading.is_none()
            && self.bullet_points.is_none()
            && self.key_message.is_none()
            && self.img_keywords.is_none()
    }
}

/// Empty and whitespace-only key messages are stored as NULL.
pub fn normalize_key_message(msg: Option<&str>) -> Option<String> {
    msg.map(str::trim).filter(|m| !m.is_empty()).map(String::from)
}
