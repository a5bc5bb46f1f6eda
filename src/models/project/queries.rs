use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::deck::Deck;
use crate::models::slide;
use super::types::{Project, ProjectSummary, ProjectUpdate};

const PROJECT_COLUMNS: &str = "id, user_id, title, topic, created_at, updated_at";

/// Store a generated deck as a new project. Project and slides are written in
/// one transaction. Returns the new project id.
pub async fn create_from_deck(
    pool: &PgPool,
    user_id: i64,
    topic: &str,
    deck: &Deck,
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO projects (id, user_id, title, topic) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(user_id)
        .bind(deck.title.trim())
        .bind(topic.trim())
        .execute(&mut *tx)
        .await?;

    slide::insert_all(&mut tx, id, &deck.slides).await?;

    tx.commit().await?;
    Ok(id)
}

/// List a user's projects, most recently changed first.
pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<ProjectSummary>, AppError> {
    let rows = sqlx::query_as::<_, ProjectSummary>(
        "SELECT p.id, p.title, p.topic, \
                (SELECT COUNT(*) FROM slides s WHERE s.project_id = p.id) AS slide_count, \
                p.created_at, p.updated_at \
         FROM projects p \
         WHERE p.user_id = $1 \
         ORDER BY p.updated_at DESC, p.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Find a project owned by `user_id`. Someone else's project is `None`.
pub async fn find_for_user(pool: &PgPool, id: Uuid, user_id: i64) -> Result<Option<Project>, AppError> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND user_id = $2");
    let project = sqlx::query_as::<_, Project>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(project)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    user_id: i64,
    changes: &ProjectUpdate,
) -> Result<Option<Project>, AppError> {
    let sql = format!(
        "UPDATE projects SET \
             title = COALESCE($3, title), \
             topic = COALESCE($4, topic), \
             updated_at = NOW() \
         WHERE id = $1 AND user_id = $2 \
         RETURNING {PROJECT_COLUMNS}"
    );
    let project = sqlx::query_as::<_, Project>(&sql)
        .bind(id)
        .bind(user_id)
        .bind(changes.title.as_deref().map(str::trim))
        .bind(changes.topic.as_deref().map(str::trim))
        .fetch_optional(pool)
        .await?;
    Ok(project)
}

/// Delete a project and (by cascade) its slides. Returns whether a row went away.
pub async fn delete(pool: &PgPool, id: Uuid, user_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
