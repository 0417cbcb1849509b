//! Refresh-token sessions.

use sqlx::FromRow;
use timeline_core::types::{DbId, Timestamp};

/// A row from `user_sessions`. One per issued refresh token.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    /// `User-Agent` of the client that signed in, when sent.
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub struct CreateSession<'a> {
    pub user_id: DbId,
    pub refresh_token_hash: &'a str,
    pub expires_at: Timestamp,
    pub user_agent: Option<&'a str>,
}
