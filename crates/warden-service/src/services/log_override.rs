//! Log-override resolver
//!
//! Channels can force message logging on or off. A channel without an
//! override inherits the decision of its parent (thread -> channel ->
//! category), and a chain that ends without any override logs.

use std::collections::{HashMap, HashSet};

use tracing::{info, instrument, warn};
use warden_cache::keys;
use warden_core::entities::{ChannelLogOverride, LogOverride, ModuleKind, OverrideOption};
use warden_core::Snowflake;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::module::ModuleService;

/// Upper bound on parent hops during resolution
pub const MAX_CHANNEL_DEPTH: usize = 16;

/// Log-override resolver service
pub struct LogOverrideService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LogOverrideService<'a> {
    /// Create a new LogOverrideService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Override state of one channel, without looking at its parents
    #[instrument(skip(self))]
    pub async fn get_channel_log_override(&self, channel_id: Snowflake) -> ServiceResult<LogOverride> {
        let repo = self.ctx.log_override_repo();
        let state = self
            .ctx
            .cache()
            .get_or_load(&keys::log_override(channel_id), || async move {
                repo.find(channel_id)
                    .await
                    .map(|row| LogOverride::from(row.map(|r| r.option)))
            })
            .await?;

        Ok(*state)
    }

    /// Decide whether messages in `channel_id` are logged
    ///
    /// `parents` maps a channel to its parent. Resolution walks up from the
    /// channel until it meets an explicit override; the walk gives up and
    /// logs on a cycle or after [`MAX_CHANNEL_DEPTH`] hops.
    #[instrument(skip(self, parents))]
    pub async fn should_log_message(
        &self,
        channel_id: Snowflake,
        guild_id: Snowflake,
        parents: &HashMap<Snowflake, Snowflake>,
    ) -> ServiceResult<bool> {
        if !ModuleService::new(self.ctx)
            .is_module_enabled(ModuleKind::MessageLog, guild_id)
            .await?
        {
            return Ok(false);
        }

        let mut current = channel_id;
        let mut visited = HashSet::new();

        for _ in 0..MAX_CHANNEL_DEPTH {
            if !visited.insert(current) {
                warn!(guild_id = %guild_id, channel_id = %channel_id, "Channel hierarchy contains a cycle");
                return Ok(true);
            }

            if let Some(decision) = self.get_channel_log_override(current).await?.decision() {
                return Ok(decision);
            }

            match parents.get(&current) {
                Some(parent) => current = *parent,
                None => return Ok(true),
            }
        }

        warn!(
            guild_id = %guild_id,
            channel_id = %channel_id,
            max_depth = MAX_CHANNEL_DEPTH,
            "Channel hierarchy deeper than allowed"
        );
        Ok(true)
    }

    /// Force logging on or off for a channel
    #[instrument(skip(self))]
    pub async fn set_channel_log_override(
        &self,
        channel_id: Snowflake,
        guild_id: Snowflake,
        option: OverrideOption,
    ) -> ServiceResult<()> {
        let row = ChannelLogOverride {
            channel_id,
            guild_id,
            option,
        };

        self.ctx.guild_settings_repo().ensure(guild_id).await?;
        self.ctx.log_override_repo().upsert(&row).await?;
        self.ctx.cache().invalidate(&keys::log_override(channel_id));

        info!(guild_id = %guild_id, channel_id = %channel_id, option = %option, "Log override set");
        Ok(())
    }

    /// Return a channel to inheriting from its parent
    ///
    /// Returns `false` if the channel had no override.
    #[instrument(skip(self))]
    pub async fn remove_channel_log_override(
        &self,
        channel_id: Snowflake,
        guild_id: Snowflake,
    ) -> ServiceResult<bool> {
        let removed = self
            .ctx
            .log_override_repo()
            .delete(channel_id, guild_id)
            .await?;
        self.ctx.cache().invalidate(&keys::log_override(channel_id));

        if removed {
            info!(guild_id = %guild_id, channel_id = %channel_id, "Log override removed");
        }
        Ok(removed)
    }

    /// Every override row of a guild
    #[instrument(skip(self))]
    pub async fn get_guild_log_overrides(
        &self,
        guild_id: Snowflake,
    ) -> ServiceResult<Vec<ChannelLogOverride>> {
        Ok(self.ctx.log_override_repo().find_by_guild(guild_id).await?)
    }
}
