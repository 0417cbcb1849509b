//! Account creation shared by `POST /auth/register` and `timeline-ctl create-user`.

use timeline_core::error::CoreError;
use timeline_core::types::DbId;
use timeline_core::user::{normalize_email, validate_email, validate_username};
use timeline_db::models::user::{CreateUser, User};
use timeline_db::repositories::UserRepo;
use timeline_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role_id: DbId,
}

/// Validate, hash and insert a new user.
///
/// Duplicate usernames and emails are reported as a 409 conflict naming the
/// clashing field.
pub async fn create_account(
    pool: &DbPool,
    account: &NewAccount<'_>,
    min_password_length: usize,
) -> AppResult<User> {
    let username = account.username.trim();
    validate_username(username).map_err(AppError::validation)?;

    let email = normalize_email(account.email);
    validate_email(&email).map_err(AppError::validation)?;

    validate_password_strength(account.password, min_password_length)
        .map_err(AppError::validation)?;

    if UserRepo::find_by_username(pool, username).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Username '{username}' is already taken"
        ))));
    }
    if UserRepo::find_by_email(pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Email '{email}' is already registered"
        ))));
    }

    let password_hash = hash_password(account.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email,
            password_hash,
            role_id: account.role_id,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Account created");
    Ok(user)
}
