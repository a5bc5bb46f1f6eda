use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::session::require_user;
use crate::auth::validate::{self, MAX_TITLE_LEN, MAX_TOPIC_LEN};
use crate::errors::AppError;
use crate::models::project::{self, ProjectDetail, ProjectUpdate};
use crate::models::slide;

/// GET projects/ - List the caller's projects
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let projects = project::list_for_user(&pool, user_id).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// GET project/{id}/ - Slides of one project, in deck order
pub async fn slides(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();

    project::find_for_user(&pool, project_id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let slides = slide::find_by_project(&pool, project_id).await?;
    Ok(HttpResponse::Ok().json(slides))
}

/// GET projects/{id}/ - Project with its slides
pub async fn read(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();

    let found = project::find_for_user(&pool, project_id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let slides = slide::find_by_project(&pool, project_id).await?;

    Ok(HttpResponse::Ok().json(ProjectDetail { project: found, slides }))
}

/// PUT/PATCH projects/{id}/ - Rename a project or change its topic
pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<Uuid>,
    body: web::Json<ProjectUpdate>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();

    let mut errors = Vec::new();
    if let Some(title) = &body.title {
        errors.extend(validate::validate_required(title, "Title", MAX_TITLE_LEN));
    }
    if let Some(topic) = &body.topic {
        errors.extend(validate::validate_optional(topic, "Topic", MAX_TOPIC_LEN));
    }
    if !errors.is_empty() {
        return Err(AppError::BadRequest(errors.join("; ")));
    }

    let updated = project::update(&pool, project_id, user_id, &body)
        .await?
        .ok_or(AppError::NotFound)?;
    let slides = slide::find_by_project(&pool, project_id).await?;

    Ok(HttpResponse::Ok().json(ProjectDetail { project: updated, slides }))
}

/// DELETE projects/{id}/ - Delete a project and its slides
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();

    if !project::delete(&pool, project_id, user_id).await? {
        return Err(AppError::NotFound);
    }
    log::info!("User {user_id} deleted project {project_id}");

    Ok(HttpResponse::NoContent().finish())
}
