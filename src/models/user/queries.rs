use sqlx::PgPool;
use crate::errors::AppError;
use super::types::{NewUser, User};

const USER_COLUMNS: &str = "id, google_sub, email, name, picture, created_at, updated_at";

/// Insert the user on first sign-in, or refresh the profile fields on later
/// ones. Keyed on the Google subject id, which never changes for an account.
pub async fn upsert_by_google_sub(pool: &PgPool, new: &NewUser) -> Result<User, AppError> {
    let sql = format!(
        "INSERT INTO users (google_sub, email, name, picture) VALUES ($1, $2, $3, $4) \
         ON CONFLICT (google_sub) DO UPDATE \
         SET email = EXCLUDED.email, name = EXCLUDED.name, picture = EXCLUDED.picture, \
             updated_at = NOW() \
         RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(&new.google_sub)
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.picture)
        .fetch_one(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}
