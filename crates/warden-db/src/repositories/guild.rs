//! PostgreSQL implementation of GuildSettingsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use warden_core::entities::GuildSettings;
use warden_core::traits::{GuildSettingsRepository, RepoResult};
use warden_core::value_objects::Snowflake;

use crate::models::GuildSettingsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of GuildSettingsRepository
#[derive(Clone)]
pub struct PgGuildSettingsRepository {
    pool: PgPool,
}

impl PgGuildSettingsRepository {
    /// Create a new PgGuildSettingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildSettingsRepository for PgGuildSettingsRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>> {
        let result = sqlx::query_as::<_, GuildSettingsModel>(
            r"
            SELECT guild_id, log_channel_id, created_at
            FROM guild_settings
            WHERE guild_id = $1
            ",
        )
        .bind(guild_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(GuildSettings::from))
    }

    #[instrument(skip(self))]
    async fn ensure(&self, guild_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO guild_settings (guild_id)
            VALUES ($1)
            ON CONFLICT (guild_id) DO NOTHING
            ",
        )
        .bind(guild_id.to_db())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_log_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO guild_settings (guild_id, log_channel_id)
            VALUES ($1, $2)
            ON CONFLICT (guild_id) DO UPDATE SET log_channel_id = EXCLUDED.log_channel_id
            ",
        )
        .bind(guild_id.to_db())
        .bind(channel_id.map(Snowflake::to_db))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
