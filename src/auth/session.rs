use actix_session::Session;
use crate::errors::AppError;

const USER_ID_KEY: &str = "user_id";

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>(USER_ID_KEY).unwrap_or(None)
}

/// Signed-in user id, or 401.
pub fn require_user(session: &Session) -> Result<i64, AppError> {
    get_user_id(session).ok_or(AppError::Unauthorized)
}

pub fn sign_in(session: &Session, user_id: i64) -> Result<(), AppError> {
    session.renew();
    session.insert(USER_ID_KEY, user_id)?;
    Ok(())
}
