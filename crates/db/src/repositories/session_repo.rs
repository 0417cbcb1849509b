//! Repository for the `user_sessions` table.

use sqlx::SqlitePool;
use timeline_core::types::{DbId, Timestamp};

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                        user_agent, created_at, updated_at";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateSession<'_>,
    ) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at, user_agent)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(input.user_agent)
            .fetch_one(pool)
            .await
    }

    /// The live session for a refresh token hash: not revoked, not expired at `now`.
    pub async fn find_by_refresh_token_hash(
        pool: &SqlitePool,
        hash: &str,
        now: Timestamp,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > $2"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// `false` when the session was already revoked.
    pub async fn revoke(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions
             SET is_revoked = true, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = $1 AND is_revoked = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every live session of a user, e.g. on logout.
    pub async fn revoke_all_for_user(pool: &SqlitePool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions
             SET is_revoked = true, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Purge revoked sessions and those that expired before `now`.
    pub async fn cleanup_expired(pool: &SqlitePool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_sessions WHERE expires_at < $1 OR is_revoked = true")
                .bind(now)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
