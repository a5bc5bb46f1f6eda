use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::deck::Slide;
use super::types::{normalize_key_message, SlidePatch, StoredSlide};

const SLIDE_COLUMNS: &str = "s.id, s.project_id, s.position, s.heading, s.bullet_points, \
                             s.key_message, s.img_keywords, s.created_at, s.updated_at";

/// All slides of a project, in deck order.
pub async fn find_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<StoredSlide>, AppError> {
    let sql = format!(
        "SELECT {SLIDE_COLUMNS} FROM slides s WHERE s.project_id = $1 ORDER BY s.position, s.id"
    );
    let slides = sqlx::query_as::<_, StoredSlide>(&sql)
        .bind(project_id)
        .fetch_all(pool)
        .await?;
    Ok(slides)
}

/// Headings of a project's slides, in deck order.
pub async fn headings_for_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<String>, AppError> {
    let headings = sqlx::query_scalar::<_, String>(
        "SELECT heading FROM slides WHERE project_id = $1 ORDER BY position, id",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;
    Ok(headings)
}

/// Insert a whole deck's slides at positions 0..n inside an open transaction.
pub async fn insert_all(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    slides: &[Slide],
) -> Result<(), AppError> {
    for (position, slide) in slides.iter().enumerate() {
        sqlx::query(
            "INSERT INTO slides (project_id, position, heading, bullet_points, key_message, img_keywords) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(project_id)
        .bind(position as i32)
        .bind(&slide.heading)
        .bind(Json(&slide.bullet_points))
        .bind(normalize_key_message(slide.key_message.as_deref()))
        .bind(&slide.img_keywords)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Append a slide after the current last one. The caller checks ownership.
pub async fn append(pool: &PgPool, project_id: Uuid, slide: &Slide) -> Result<StoredSlide, AppError> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        "INSERT INTO slides AS s (project_id, position, heading, bullet_points, key_message, img_keywords) \
         VALUES ($1, \
                 (SELECT COALESCE(MAX(position), -1) + 1 FROM slides WHERE project_id = $1), \
                 $2, $3, $4, $5) \
         RETURNING {SLIDE_COLUMNS}"
    );
    let stored = sqlx::query_as::<_, StoredSlide>(&sql)
        .bind(project_id)
        .bind(&slide.heading)
        .bind(Json(&slide.bullet_points))
        .bind(normalize_key_message(slide.key_message.as_deref()))
        .bind(&slide.img_keywords)
        .fetch_one(&mut *tx)
        .await?;

    touch_project(&mut tx, project_id).await?;
    tx.commit().await?;
    Ok(stored)
}

/// Find a slide whose project belongs to `user_id`.
pub async fn find_owned(pool: &PgPool, slide_id: i64, user_id: i64) -> Result<Option<StoredSlide>, AppError> {
    let sql = format!(
        "SELECT {SLIDE_COLUMNS} FROM slides s \
         JOIN projects p ON p.id = s.project_id \
         WHERE s.id = $1 AND p.user_id = $2"
    );
    let slide = sqlx::query_as::<_, StoredSlide>(&sql)
        .bind(slide_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(slide)
}

/// Apply a partial update to a slide owned by `user_id`.
/// Returns `None` when the slide does not exist or belongs to someone else.
pub async fn update(
    pool: &PgPool,
    slide_id: i64,
    user_id: i64,
    patch: &SlidePatch,
) -> Result<Option<StoredSlide>, AppError> {
    let mut tx = pool.begin().await?;

    // key_message: $5 says whether the field was sent, $6 is the new value.
    let sql = format!(
        "UPDATE slides AS s SET \
             heading = COALESCE($3, s.heading), \
             bullet_points = COALESCE($4, s.bullet_points), \
             key_message = CASE WHEN $5 THEN $6 ELSE s.key_message END, \
             img_keywords = COALESCE($7, s.img_keywords), \
             updated_at = NOW() \
         FROM projects p \
         WHERE s.id = $1 AND p.id = s.project_id AND p.user_id = $2 \
         RETURNING {SLIDE_COLUMNS}"
    );
    let updated = sqlx::query_as::<_, StoredSlide>(&sql)
        .bind(slide_id)
        .bind(user_id)
        .bind(patch.heading.as_deref().map(str::trim))
        .bind(patch.bullet_points.as_ref().map(Json))
        .bind(patch.key_message.is_some())
        .bind(normalize_key_message(patch.key_message.as_deref()))
        .bind(patch.img_keywords.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

    if let Some(slide) = &updated {
        touch_project(&mut tx, slide.project_id).await?;
    }
    tx.commit().await?;
    Ok(updated)
}

async fn touch_project(tx: &mut Transaction<'_, Postgres>, project_id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE projects SET updated_at = NOW() WHERE id = $1")
        .bind(project_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
