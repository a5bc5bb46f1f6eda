use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use std::fmt;

use crate::ai::GenerateError;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Session(String),
    Identity(String),
    Config(String),
    Generate(GenerateError),
    BadRequest(String),
    Unauthorized,
    NotFound,
}

/// JSON error body returned by every endpoint.
#[derive(Serialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiErrorResponse {
    pub fn new(error: &str, details: Option<String>) -> Self {
        ApiErrorResponse { error: error.to_string(), details }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Identity(e) => write!(f, "Identity error: {e}"),
            AppError::Config(e) => write!(f, "Configuration error: {e}"),
            AppError::Generate(e) => write!(f, "{e}"),
            AppError::BadRequest(e) => write!(f, "Bad request: {e}"),
            AppError::Unauthorized => write!(f, "Authentication required"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized | AppError::Identity(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Generate(GenerateError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Generate(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound => ApiErrorResponse::new("Not found", None),
            AppError::Unauthorized => ApiErrorResponse::new("Authentication required", None),
            AppError::BadRequest(msg) => {
                ApiErrorResponse::new("Validation failed", Some(msg.clone()))
            }
            AppError::Identity(msg) => {
                log::warn!("Rejected identity token: {msg}");
                ApiErrorResponse::new("Invalid identity token", Some(msg.clone()))
            }
            AppError::Generate(e) => {
                log::error!("Generation failed ({}): {e}", e.kind());
                ApiErrorResponse::new(e.kind(), Some(e.to_string()))
            }
            _ => {
                log::error!("{self}");
                ApiErrorResponse::new("Internal Server Error", None)
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound,
            other => AppError::Db(other),
        }
    }
}

impl From<GenerateError> for AppError {
    fn from(e: GenerateError) -> Self {
        AppError::Generate(e)
    }
}

impl From<actix_session::SessionInsertError> for AppError {
    fn from(e: actix_session::SessionInsertError) -> Self {
        AppError::Session(e.to_string())
    }
}

impl From<actix_session::SessionGetError> for AppError {
    fn from(e: actix_session::SessionGetError) -> Self {
        AppError::Session(e.to_string())
    }
}
