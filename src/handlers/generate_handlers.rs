use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::ai::ContentGenerator;
use crate::auth::session::require_user;
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::deck::Deck;
use crate::models::{project, slide};

#[derive(Deserialize, Debug)]
pub struct TopicRequest {
    pub topic: String,
}

#[derive(Serialize, Debug)]
pub struct GeneratedDeckResponse {
    pub project_id: Uuid,
    #[serde(flatten)]
    pub deck: Deck,
}

#[derive(Serialize, Debug)]
pub struct TitleResponse {
    pub title: String,
}

fn check_topic(topic: &str) -> Result<&str, AppError> {
    match validate::validate_topic(topic) {
        Some(msg) => Err(AppError::BadRequest(msg)),
        None => Ok(topic.trim()),
    }
}

/// POST generate_slide/ - Generate a deck for a topic and save it as a new project.
pub async fn generate_slide(
    pool: web::Data<PgPool>,
    generator: web::Data<ContentGenerator>,
    session: Session,
    body: web::Json<TopicRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let topic = check_topic(&body.topic)?;

    let deck = generator.generate_deck(topic).await?;
    let project_id = project::create_from_deck(&pool, user_id, topic, &deck).await?;
    log::info!(
        "User {user_id} generated project {project_id} ({} slides)",
        deck.slides.len()
    );

    Ok(HttpResponse::Created().json(GeneratedDeckResponse { project_id, deck }))
}

/// POST generate-title-slide/ - Suggest a presentation title for a topic.
pub async fn generate_title(
    generator: web::Data<ContentGenerator>,
    session: Session,
    body: web::Json<TopicRequest>,
) -> Result<HttpResponse, AppError> {
    require_user(&session)?;
    let topic = check_topic(&body.topic)?;

    let title = generator.suggest_deck_title(topic).await?;
    Ok(HttpResponse::Ok().json(TitleResponse { title }))
}

/// POST suggest-slide-title/{id}/ - Suggest a title for the next slide of a project.
pub async fn suggest_slide_title(
    pool: web::Data<PgPool>,
    generator: web::Data<ContentGenerator>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();

    let found = project::find_for_user(&pool, project_id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let headings = slide::headings_for_project(&pool, project_id).await?;

    let title = generator.suggest_slide_title(&found.title, &headings).await?;
    Ok(HttpResponse::Ok().json(TitleResponse { title }))
}
