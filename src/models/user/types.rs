use chrono::{DateTime, Utc};
use serde::Serialize;

/// Account created on first Google sign-in.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    #[serde(skip_serializing)]
    pub google_sub: String,
    pub email: String,
    pub name: String,
    pub picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile data from a verified identity token.
pub struct NewUser {
    pub google_sub: String,
    pub email: String,
    pub name: String,
    pub picture: String,
}
