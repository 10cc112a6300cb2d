//! PostgreSQL implementation of TrackerRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use warden_core::entities::Tracker;
use warden_core::traits::{RepoResult, TrackerRepository};
use warden_core::value_objects::Snowflake;

use crate::models::TrackerModel;

use super::error::map_db_error;

/// PostgreSQL implementation of TrackerRepository
#[derive(Clone)]
pub struct PgTrackerRepository {
    pool: PgPool,
}

impl PgTrackerRepository {
    /// Create a new PgTrackerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackerRepository for PgTrackerRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Tracker>> {
        let result = sqlx::query_as::<_, TrackerModel>(
            r"
            SELECT user_id, guild_id, log_channel_id, moderator_id, end_time
            FROM trackers
            WHERE guild_id = $1 AND user_id = $2
            ",
        )
        .bind(guild_id.to_db())
        .bind(user_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Tracker::from))
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Tracker>> {
        let results = sqlx::query_as::<_, TrackerModel>(
            r"
            SELECT user_id, guild_id, log_channel_id, moderator_id, end_time
            FROM trackers
            WHERE guild_id = $1
            ORDER BY end_time
            ",
        )
        .bind(guild_id.to_db())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Tracker::from).collect())
    }

    #[instrument(skip(self), fields(guild_id = %tracker.guild_id, user_id = %tracker.user_id))]
    async fn upsert(&self, tracker: &Tracker) -> RepoResult<Tracker> {
        let stored = sqlx::query_as::<_, TrackerModel>(
            r"
            INSERT INTO trackers (user_id, guild_id, log_channel_id, moderator_id, end_time)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, guild_id) DO UPDATE
            SET log_channel_id = EXCLUDED.log_channel_id,
                moderator_id = EXCLUDED.moderator_id,
                end_time = EXCLUDED.end_time
            RETURNING user_id, guild_id, log_channel_id, moderator_id, end_time
            ",
        )
        .bind(tracker.user_id.to_db())
        .bind(tracker.guild_id.to_db())
        .bind(tracker.log_channel_id.to_db())
        .bind(tracker.moderator_id.to_db())
        .bind(tracker.end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Tracker::from(stored))
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Tracker>> {
        let result = sqlx::query_as::<_, TrackerModel>(
            r"
            DELETE FROM trackers
            WHERE guild_id = $1 AND user_id = $2
            RETURNING user_id, guild_id, log_channel_id, moderator_id, end_time
            ",
        )
        .bind(guild_id.to_db())
        .bind(user_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Tracker::from))
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<Tracker>> {
        let results = sqlx::query_as::<_, TrackerModel>(
            r"
            DELETE FROM trackers
            WHERE end_time <= $1
            RETURNING user_id, guild_id, log_channel_id, moderator_id, end_time
            ",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Tracker::from).collect())
    }
}
