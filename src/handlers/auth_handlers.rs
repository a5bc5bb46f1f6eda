use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::google::IdentityVerifier;
use crate::auth::session::sign_in;
use crate::errors::AppError;
use crate::models::user::{self, NewUser};

#[derive(Deserialize)]
pub struct GoogleAuthRequest {
    /// ID token from Google Identity Services (sent as `credential` by the JS SDK).
    #[serde(alias = "credential")]
    pub token: String,
}

/// POST google-auth/ - Exchange a Google ID token for a session
pub async fn google_auth(
    pool: web::Data<PgPool>,
    verifier: web::Data<dyn IdentityVerifier>,
    session: Session,
    body: web::Json<GoogleAuthRequest>,
) -> Result<HttpResponse, AppError> {
    let token = body.token.trim();
    if token.is_empty() {
        return Err(AppError::BadRequest("Token is required".to_string()));
    }

    let identity = verifier.verify(token).await?;

    let u = user::upsert_by_google_sub(
        &pool,
        &NewUser {
            google_sub: identity.sub,
            email: identity.email,
            name: identity.name,
            picture: identity.picture,
        },
    )
    .await?;

    sign_in(&session, u.id)?;
    log::info!("User {} signed in", u.id);

    Ok(HttpResponse::Ok().json(u))
}

/// POST logout/ - End the session
pub async fn logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}
