use std::sync::Arc;

use actix_web::{HttpServer, cookie::Key, web};

use deckgen::ai::ContentGenerator;
use deckgen::auth::google::{GoogleTokenVerifier, IdentityVerifier};
use deckgen::config::AppConfig;
use deckgen::{db, routes};

fn io_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(|e| io_error("Invalid configuration", e))?;

    let pool = db::init_pool(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| io_error("Failed to connect to database", e))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| io_error("Failed to run migrations", e))?;

    let generator = ContentGenerator::gemini(config.gemini.clone())
        .map_err(|e| io_error("Failed to set up content generator", e))?;
    if !generator.is_configured() {
        log::warn!("GEMINI_API is not set; generation requests will fail until it is");
    }
    let generator = web::Data::new(generator);

    let verifier: Arc<dyn IdentityVerifier> = Arc::new(
        GoogleTokenVerifier::new(config.google_client_id.clone())
            .map_err(|e| io_error("Failed to set up identity verifier", e))?,
    );
    let verifier = web::Data::from(verifier);
    if config.google_client_id.is_none() {
        log::warn!("GOOGLE_CLIENT_ID is not set; ID token audience will not be checked");
    }

    // Session signing key: SESSION_KEY keeps sessions valid across restarts
    let secret_key = match &config.session_key {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let state = routes::AppState {
        pool: web::Data::new(pool),
        generator,
        verifier,
    };
    let cookie_secure = config.cookie_secure;
    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || routes::build_app(state.clone(), secret_key.clone(), cookie_secure))
        .bind(&config.bind_addr)?
        .run()
        .await
}
