//! PostgreSQL implementation of ModuleSettingsRepository
//!
//! Every module owns one table keyed by `guild_id` with a `module_enabled`
//! column. Saves are upserts so rows appear on first write.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use warden_core::entities::{
    CommandSettings, LevelingSettings, MessageLogSettings, ModerationSettings, ModuleKind,
    UserLogSettings,
};
use warden_core::error::DomainError;
use warden_core::traits::{ModuleSettingsRepository, RepoResult};
use warden_core::value_objects::Snowflake;

use crate::models::{
    CommandSettingsModel, LevelingSettingsModel, LogSettingsModel, ModerationSettingsModel,
};

use super::error::map_db_error;

/// Settings table of a module
fn settings_table(module: ModuleKind) -> RepoResult<&'static str> {
    match module {
        ModuleKind::Leveling => Ok("leveling_settings"),
        ModuleKind::Moderation => Ok("moderation_settings"),
        ModuleKind::MessageLog => Ok("message_log_settings"),
        ModuleKind::UserLog => Ok("user_log_settings"),
        ModuleKind::Commands => Ok("command_settings"),
        ModuleKind::General => Err(DomainError::ModuleWithoutSettings(module.as_str())),
    }
}

/// PostgreSQL implementation of ModuleSettingsRepository
#[derive(Clone)]
pub struct PgModuleSettingsRepository {
    pool: PgPool,
}

impl PgModuleSettingsRepository {
    /// Create a new PgModuleSettingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_log_settings(
        &self,
        table: &'static str,
        guild_id: Snowflake,
    ) -> RepoResult<Option<LogSettingsModel>> {
        let sql = format!(
            "SELECT guild_id, module_enabled, log_channel_id FROM {table} WHERE guild_id = $1"
        );
        sqlx::query_as::<_, LogSettingsModel>(&sql)
            .bind(guild_id.to_db())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn save_log_settings(
        &self,
        table: &'static str,
        guild_id: Snowflake,
        module_enabled: bool,
        log_channel_id: Option<Snowflake>,
    ) -> RepoResult<()> {
        let sql = format!(
            r"
            INSERT INTO {table} (guild_id, module_enabled, log_channel_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (guild_id) DO UPDATE
            SET module_enabled = EXCLUDED.module_enabled,
                log_channel_id = EXCLUDED.log_channel_id
            "
        );
        sqlx::query(&sql)
            .bind(guild_id.to_db())
            .bind(module_enabled)
            .bind(log_channel_id.map(Snowflake::to_db))
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}

#[async_trait]
impl ModuleSettingsRepository for PgModuleSettingsRepository {
    #[instrument(skip(self))]
    async fn find_module_enabled(
        &self,
        module: ModuleKind,
        guild_id: Snowflake,
    ) -> RepoResult<Option<bool>> {
        let table = settings_table(module)?;
        let sql = format!("SELECT module_enabled FROM {table} WHERE guild_id = $1");

        sqlx::query_scalar::<_, bool>(&sql)
            .bind(guild_id.to_db())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn set_module_enabled(
        &self,
        module: ModuleKind,
        guild_id: Snowflake,
        enabled: bool,
    ) -> RepoResult<()> {
        let table = settings_table(module)?;
        let sql = format!(
            r"
            INSERT INTO {table} (guild_id, module_enabled)
            VALUES ($1, $2)
            ON CONFLICT (guild_id) DO UPDATE SET module_enabled = EXCLUDED.module_enabled
            "
        );

        sqlx::query(&sql)
            .bind(guild_id.to_db())
            .bind(enabled)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_leveling(&self, guild_id: Snowflake) -> RepoResult<Option<LevelingSettings>> {
        let result = sqlx::query_as::<_, LevelingSettingsModel>(
            r"
            SELECT guild_id, module_enabled, base, modifier, amount, text_time, level_channel_log_id
            FROM leveling_settings
            WHERE guild_id = $1
            ",
        )
        .bind(guild_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(LevelingSettings::from))
    }

    #[instrument(skip(self), fields(guild_id = %settings.guild_id))]
    async fn save_leveling(&self, settings: &LevelingSettings) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO leveling_settings
                (guild_id, module_enabled, base, modifier, amount, text_time, level_channel_log_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (guild_id) DO UPDATE
            SET module_enabled = EXCLUDED.module_enabled,
                base = EXCLUDED.base,
                modifier = EXCLUDED.modifier,
                amount = EXCLUDED.amount,
                text_time = EXCLUDED.text_time,
                level_channel_log_id = EXCLUDED.level_channel_log_id
            ",
        )
        .bind(settings.guild_id.to_db())
        .bind(settings.module_enabled)
        .bind(settings.base)
        .bind(settings.modifier)
        .bind(settings.amount)
        .bind(settings.text_time)
        .bind(settings.level_channel_log_id.map(Snowflake::to_db))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_moderation(
        &self,
        guild_id: Snowflake,
    ) -> RepoResult<Option<ModerationSettings>> {
        let result = sqlx::query_as::<_, ModerationSettingsModel>(
            r"
            SELECT guild_id, module_enabled, mute_role_id, log_channel_id
            FROM moderation_settings
            WHERE guild_id = $1
            ",
        )
        .bind(guild_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ModerationSettings::from))
    }

    #[instrument(skip(self), fields(guild_id = %settings.guild_id))]
    async fn save_moderation(&self, settings: &ModerationSettings) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO moderation_settings (guild_id, module_enabled, mute_role_id, log_channel_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (guild_id) DO UPDATE
            SET module_enabled = EXCLUDED.module_enabled,
                mute_role_id = EXCLUDED.mute_role_id,
                log_channel_id = EXCLUDED.log_channel_id
            ",
        )
        .bind(settings.guild_id.to_db())
        .bind(settings.module_enabled)
        .bind(settings.mute_role_id.map(Snowflake::to_db))
        .bind(settings.log_channel_id.map(Snowflake::to_db))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_message_log(
        &self,
        guild_id: Snowflake,
    ) -> RepoResult<Option<MessageLogSettings>> {
        let result = self
            .find_log_settings("message_log_settings", guild_id)
            .await?;
        Ok(result.map(MessageLogSettings::from))
    }

    #[instrument(skip(self), fields(guild_id = %settings.guild_id))]
    async fn save_message_log(&self, settings: &MessageLogSettings) -> RepoResult<()> {
        self.save_log_settings(
            "message_log_settings",
            settings.guild_id,
            settings.module_enabled,
            settings.log_channel_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_user_log(&self, guild_id: Snowflake) -> RepoResult<Option<UserLogSettings>> {
        let result = self.find_log_settings("user_log_settings", guild_id).await?;
        Ok(result.map(UserLogSettings::from))
    }

    #[instrument(skip(self), fields(guild_id = %settings.guild_id))]
    async fn save_user_log(&self, settings: &UserLogSettings) -> RepoResult<()> {
        self.save_log_settings(
            "user_log_settings",
            settings.guild_id,
            settings.module_enabled,
            settings.log_channel_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_commands(&self, guild_id: Snowflake) -> RepoResult<Option<CommandSettings>> {
        let result = sqlx::query_as::<_, CommandSettingsModel>(
            r"
            SELECT guild_id, module_enabled, prefix
            FROM command_settings
            WHERE guild_id = $1
            ",
        )
        .bind(guild_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(CommandSettings::from))
    }

    #[instrument(skip(self), fields(guild_id = %settings.guild_id))]
    async fn save_commands(&self, settings: &CommandSettings) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO command_settings (guild_id, module_enabled, prefix)
            VALUES ($1, $2, $3)
            ON CONFLICT (guild_id) DO UPDATE
            SET module_enabled = EXCLUDED.module_enabled,
                prefix = EXCLUDED.prefix
            ",
        )
        .bind(settings.guild_id.to_db())
        .bind(settings.module_enabled)
        .bind(settings.prefix.as_deref())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
