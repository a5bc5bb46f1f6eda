use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::session::require_user;
use crate::auth::validate::{self, MAX_TITLE_LEN};
use crate::errors::AppError;
use crate::models::deck::Slide;
use crate::models::{project, slide::{self, SlidePatch}};

/// PUT/PATCH slide-edit/{id}/ - Partial update of one slide
pub async fn edit(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<SlidePatch>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let slide_id = path.into_inner();

    if body.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }
    if let Some(heading) = &body.heading {
        if let Some(msg) = validate::validate_required(heading, "Heading", MAX_TITLE_LEN) {
            return Err(AppError::BadRequest(msg));
        }
    }

    let updated = slide::update(&pool, slide_id, user_id, &body)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(updated))
}

/// POST add-slide/{id}/ - Append a slide to a project
pub async fn add(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<Uuid>,
    body: web::Json<Slide>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();

    if let Some(msg) = validate::validate_required(&body.heading, "Heading", MAX_TITLE_LEN) {
        return Err(AppError::BadRequest(msg));
    }

    project::find_for_user(&pool, project_id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let stored = slide::append(&pool, project_id, &body).await?;
    Ok(HttpResponse::Created().json(stored))
}
