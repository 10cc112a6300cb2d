//! PostgreSQL implementation of LogOverrideRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use warden_core::entities::ChannelLogOverride;
use warden_core::traits::{LogOverrideRepository, RepoResult};
use warden_core::value_objects::Snowflake;

use crate::models::LogOverrideModel;

use super::error::map_db_error;

/// PostgreSQL implementation of LogOverrideRepository
#[derive(Clone)]
pub struct PgLogOverrideRepository {
    pool: PgPool,
}

impl PgLogOverrideRepository {
    /// Create a new PgLogOverrideRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogOverrideRepository for PgLogOverrideRepository {
    #[instrument(skip(self))]
    async fn find(&self, channel_id: Snowflake) -> RepoResult<Option<ChannelLogOverride>> {
        let result = sqlx::query_as::<_, LogOverrideModel>(
            r"
            SELECT channel_id, guild_id, option
            FROM message_log_channel_overrides
            WHERE channel_id = $1
            ",
        )
        .bind(channel_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ChannelLogOverride::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<ChannelLogOverride>> {
        let results = sqlx::query_as::<_, LogOverrideModel>(
            r"
            SELECT channel_id, guild_id, option
            FROM message_log_channel_overrides
            WHERE guild_id = $1
            ORDER BY channel_id
            ",
        )
        .bind(guild_id.to_db())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results
            .into_iter()
            .map(ChannelLogOverride::try_from)
            .collect()
    }

    #[instrument(skip(self), fields(channel_id = %log_override.channel_id))]
    async fn upsert(&self, log_override: &ChannelLogOverride) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO message_log_channel_overrides (channel_id, guild_id, option)
            VALUES ($1, $2, $3)
            ON CONFLICT (channel_id) DO UPDATE
            SET guild_id = EXCLUDED.guild_id,
                option = EXCLUDED.option
            ",
        )
        .bind(log_override.channel_id.to_db())
        .bind(log_override.guild_id.to_db())
        .bind(log_override.option.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, channel_id: Snowflake, guild_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM message_log_channel_overrides
            WHERE channel_id = $1 AND guild_id = $2
            ",
        )
        .bind(channel_id.to_db())
        .bind(guild_id.to_db())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
