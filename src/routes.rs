//! URL table of the JSON API.
//!
//! UUID and integer path segments are parsed by the `web::Path` extractors;
//! a segment that does not parse answers 404, same as an unknown path.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{
    App, Error,
    body::MessageBody,
    cookie::Key,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{self, from_fn},
    web,
};
use sqlx::PgPool;

use crate::ai::ContentGenerator;
use crate::auth::google::IdentityVerifier;
use crate::auth::middleware::require_json_content_type;
use crate::handlers::{
    auth_handlers, generate_handlers, profile_handlers, project_handlers, slide_handlers,
};

/// Shared state handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub pool: web::Data<PgPool>,
    pub generator: web::Data<ContentGenerator>,
    pub verifier: web::Data<dyn IdentityVerifier>,
}

/// Assemble the application: session, path normalization, request logging,
/// extractor configs, the route table and the 404 fallback.
pub fn build_app(
    state: AppState,
    session_key: Key,
    cookie_secure: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), session_key)
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .build();

    App::new()
        .wrap(session_mw)
        .wrap(middleware::NormalizePath::new(middleware::TrailingSlash::Always))
        .wrap(middleware::Logger::default())
        .app_data(state.pool)
        .app_data(state.generator)
        .app_data(state.verifier)
        .app_data(json_config())
        .app_data(path_config())
        .configure(configure)
        .default_service(web::to(not_found))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Generation
    cfg.service(
        web::resource("/generate_slide/")
            .name("generate_slide")
            .wrap(from_fn(require_json_content_type))
            .route(web::post().to(generate_handlers::generate_slide)),
    );
    cfg.service(
        web::resource("/generate-title-slide/")
            .name("generate_title_slide")
            .wrap(from_fn(require_json_content_type))
            .route(web::post().to(generate_handlers::generate_title)),
    );
    cfg.service(
        web::resource("/suggest-slide-title/{project_id}/")
            .name("suggest_slide_title")
            .wrap(from_fn(require_json_content_type))
            .route(web::post().to(generate_handlers::suggest_slide_title)),
    );

    // Projects
    cfg.service(
        web::resource("/projects/")
            .name("projects")
            .route(web::get().to(project_handlers::list)),
    );
    cfg.service(
        web::resource("/project/{project_id}/")
            .name("project_slides")
            .route(web::get().to(project_handlers::slides)),
    );
    cfg.service(
        web::resource("/projects/{project_id}/")
            .name("project_update")
            .wrap(from_fn(require_json_content_type))
            .route(web::get().to(project_handlers::read))
            .route(web::put().to(project_handlers::update))
            .route(web::patch().to(project_handlers::update))
            .route(web::delete().to(project_handlers::delete)),
    );

    // Slides
    cfg.service(
        web::resource("/slide-edit/{id}/")
            .name("slide_edit")
            .wrap(from_fn(require_json_content_type))
            .route(web::put().to(slide_handlers::edit))
            .route(web::patch().to(slide_handlers::edit)),
    );
    cfg.service(
        web::resource("/add-slide/{project_id}/")
            .name("add_slide")
            .wrap(from_fn(require_json_content_type))
            .route(web::post().to(slide_handlers::add)),
    );

    // Account
    cfg.service(
        web::resource("/google-auth/")
            .name("google_auth")
            .wrap(from_fn(require_json_content_type))
            .route(web::post().to(auth_handlers::google_auth)),
    );
    cfg.service(
        web::resource("/logout/")
            .name("logout")
            .wrap(from_fn(require_json_content_type))
            .route(web::post().to(auth_handlers::logout)),
    );
    cfg.service(
        web::resource("/user-profile/")
            .name("user_profile")
            .route(web::get().to(profile_handlers::user_profile)),
    );
}

/// JSON 404 for anything the table does not match.
pub async fn not_found() -> actix_web::HttpResponse {
    actix_web::HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}

/// Body limits and JSON-shaped errors for `web::Json` extraction failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| crate::errors::AppError::BadRequest(err.to_string()).into())
}

/// Path segments that fail to parse (bad UUID, non-numeric id) answer 404.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, _req| crate::errors::AppError::NotFound.into())
}
