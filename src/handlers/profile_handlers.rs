use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::session::require_user;
use crate::errors::AppError;
use crate::models::user;

/// GET user-profile/ - The signed-in user's profile
pub async fn user_profile(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;

    // A session can outlive its user row.
    let u = user::find_by_id(&pool, user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(u))
}
