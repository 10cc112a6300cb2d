//! PostgreSQL implementation of LockRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use warden_core::entities::Lock;
use warden_core::traits::{LockRepository, RepoResult};
use warden_core::value_objects::Snowflake;

use crate::models::LockModel;

use super::error::map_db_error;

/// PostgreSQL implementation of LockRepository
#[derive(Clone)]
pub struct PgLockRepository {
    pool: PgPool,
}

impl PgLockRepository {
    /// Create a new PgLockRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LockRepository for PgLockRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<Option<Lock>> {
        let result = sqlx::query_as::<_, LockModel>(
            r"
            SELECT channel_id, guild_id, moderator_id, end_time,
                   previously_allowed, previously_denied, reason
            FROM locks
            WHERE guild_id = $1 AND channel_id = $2
            ",
        )
        .bind(guild_id.to_db())
        .bind(channel_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Lock::from))
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Lock>> {
        let results = sqlx::query_as::<_, LockModel>(
            r"
            SELECT channel_id, guild_id, moderator_id, end_time,
                   previously_allowed, previously_denied, reason
            FROM locks
            WHERE guild_id = $1
            ORDER BY end_time
            ",
        )
        .bind(guild_id.to_db())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Lock::from).collect())
    }

    #[instrument(skip(self), fields(guild_id = %lock.guild_id, channel_id = %lock.channel_id))]
    async fn upsert(&self, lock: &Lock) -> RepoResult<Lock> {
        let stored = sqlx::query_as::<_, LockModel>(
            r"
            INSERT INTO locks (channel_id, guild_id, moderator_id, end_time,
                               previously_allowed, previously_denied, reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (channel_id, guild_id) DO UPDATE
            SET moderator_id = EXCLUDED.moderator_id,
                end_time = EXCLUDED.end_time,
                reason = EXCLUDED.reason
            RETURNING channel_id, guild_id, moderator_id, end_time,
                      previously_allowed, previously_denied, reason
            ",
        )
        .bind(lock.channel_id.to_db())
        .bind(lock.guild_id.to_db())
        .bind(lock.moderator_id.to_db())
        .bind(lock.end_time)
        .bind(lock.previously_allowed.to_i64())
        .bind(lock.previously_denied.to_i64())
        .bind(lock.reason.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Lock::from(stored))
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<Option<Lock>> {
        let result = sqlx::query_as::<_, LockModel>(
            r"
            DELETE FROM locks
            WHERE guild_id = $1 AND channel_id = $2
            RETURNING channel_id, guild_id, moderator_id, end_time,
                      previously_allowed, previously_denied, reason
            ",
        )
        .bind(guild_id.to_db())
        .bind(channel_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Lock::from))
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<Lock>> {
        let results = sqlx::query_as::<_, LockModel>(
            r"
            DELETE FROM locks
            WHERE end_time <= $1
            RETURNING channel_id, guild_id, moderator_id, end_time,
                      previously_allowed, previously_denied, reason
            ",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Lock::from).collect())
    }
}
