//! Log channel resolution
//!
//! `General` output goes to the guild-wide log channel. Every other log type
//! belongs to a module and resolves to nothing while that module is off.

use tracing::{info, instrument};
use warden_cache::keys;
use warden_core::entities::{
    LevelingSettings, LogType, MessageLogSettings, ModerationSettings, UserLogSettings,
};
use warden_core::Snowflake;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::module::ModuleService;

/// Log channel service
pub struct LogChannelService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LogChannelService<'a> {
    /// Create a new LogChannelService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Configured destination for a log type
    #[instrument(skip(self))]
    pub async fn get_log_channel(
        &self,
        log_type: LogType,
        guild_id: Snowflake,
    ) -> ServiceResult<Option<Snowflake>> {
        let modules = ModuleService::new(self.ctx);
        if !modules
            .is_module_enabled(log_type.owning_module(), guild_id)
            .await?
        {
            return Ok(None);
        }

        let channel = match log_type {
            LogType::General => {
                let repo = self.ctx.guild_settings_repo();
                let guild = self
                    .ctx
                    .cache()
                    .get_or_load(&keys::guild_settings(guild_id), || async move {
                        repo.find(guild_id).await
                    })
                    .await?;
                (*guild).as_ref().and_then(|g| g.log_channel_id)
            }
            LogType::MessageLog => {
                modules
                    .get_settings::<MessageLogSettings>(guild_id)
                    .await?
                    .log_channel_id
            }
            LogType::UserLog => {
                modules
                    .get_settings::<UserLogSettings>(guild_id)
                    .await?
                    .log_channel_id
            }
            LogType::Moderation => {
                modules
                    .get_settings::<ModerationSettings>(guild_id)
                    .await?
                    .log_channel_id
            }
            LogType::Leveling => {
                modules
                    .get_settings::<LevelingSettings>(guild_id)
                    .await?
                    .level_channel_log_id
            }
        };

        Ok(channel)
    }

    /// Set or clear the destination of a log type
    ///
    /// Module-owned destinations can be configured while the module is off;
    /// they take effect once it is switched on.
    #[instrument(skip(self))]
    pub async fn set_log_channel(
        &self,
        log_type: LogType,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> ServiceResult<()> {
        let modules = ModuleService::new(self.ctx);

        match log_type {
            LogType::General => {
                self.ctx.guild_settings_repo().ensure(guild_id).await?;
                self.ctx
                    .guild_settings_repo()
                    .set_log_channel(guild_id, channel_id)
                    .await?;
                self.ctx.cache().invalidate(&keys::guild_settings(guild_id));
            }
            LogType::MessageLog => {
                let mut settings = (*modules.get_settings::<MessageLogSettings>(guild_id).await?).clone();
                settings.log_channel_id = channel_id;
                modules.save_settings(&settings).await?;
            }
            LogType::UserLog => {
                let mut settings = (*modules.get_settings::<UserLogSettings>(guild_id).await?).clone();
                settings.log_channel_id = channel_id;
                modules.save_settings(&settings).await?;
            }
            LogType::Moderation => {
                let mut settings = (*modules.get_settings::<ModerationSettings>(guild_id).await?).clone();
                settings.log_channel_id = channel_id;
                modules.save_settings(&settings).await?;
            }
            LogType::Leveling => {
                let mut settings = (*modules.get_settings::<LevelingSettings>(guild_id).await?).clone();
                settings.level_channel_log_id = channel_id;
                modules.save_settings(&settings).await?;
            }
        }

        info!(guild_id = %guild_id, log_type = %log_type, channel_id = ?channel_id, "Log channel updated");
        Ok(())
    }
}
