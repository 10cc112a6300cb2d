//! Leveling service
//!
//! Guild-specific front end of the XP curve plus level rewards. The curve
//! arithmetic itself lives in `warden_core::leveling`; this service only
//! supplies each guild's parameters.

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;
use warden_cache::keys;
use warden_core::entities::{LevelingSettings, Reward, RewardSet};
use warden_core::{DomainError, Snowflake};

use crate::dto::{SetRewardRequest, UpdateLevelingSettingsRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::module::ModuleService;

/// Leveling service
pub struct LevelingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LevelingService<'a> {
    /// Create a new LevelingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Leveling settings of a guild, defaults when never configured
    #[instrument(skip(self))]
    pub async fn get_leveling_settings(
        &self,
        guild_id: Snowflake,
    ) -> ServiceResult<Arc<LevelingSettings>> {
        ModuleService::new(self.ctx)
            .get_settings::<LevelingSettings>(guild_id)
            .await
    }

    /// Apply a partial update to the curve parameters
    #[instrument(skip(self, request))]
    pub async fn update_leveling_settings(
        &self,
        guild_id: Snowflake,
        request: UpdateLevelingSettingsRequest,
    ) -> ServiceResult<LevelingSettings> {
        request.validate()?;

        let modules = ModuleService::new(self.ctx);
        let mut settings = (*modules.get_settings::<LevelingSettings>(guild_id).await?).clone();
        if request.is_empty() {
            return Ok(settings);
        }

        if let Some(base) = request.base {
            settings.base = base;
        }
        if let Some(modifier) = request.modifier {
            settings.modifier = modifier;
        }
        if let Some(amount) = request.amount {
            settings.amount = amount;
        }
        if let Some(text_time) = request.text_time {
            settings.text_time = text_time;
        }
        settings
            .validate()
            .map_err(|e| DomainError::InvalidLevelingSettings(e.to_string()))?;

        modules.save_settings(&settings).await?;

        info!(
            guild_id = %guild_id,
            base = settings.base,
            modifier = settings.modifier,
            amount = settings.amount,
            "Leveling settings updated"
        );
        Ok(settings)
    }

    /// Level reached with `xp` total XP in this guild
    #[instrument(skip(self))]
    pub async fn get_level_from_xp(&self, guild_id: Snowflake, xp: i64) -> ServiceResult<i32> {
        let settings = self.get_leveling_settings(guild_id).await?;
        Ok(settings.curve().level_from_xp(xp))
    }

    /// Total XP needed for `level + level_modifier` in this guild
    #[instrument(skip(self))]
    pub async fn get_xp_needed_for_level(
        &self,
        guild_id: Snowflake,
        level: i32,
        level_modifier: i32,
    ) -> ServiceResult<i64> {
        let settings = self.get_leveling_settings(guild_id).await?;
        Ok(settings.curve().xp_needed_for_level(level, level_modifier))
    }

    /// XP still missing to the next level, `None` at the level cap
    #[instrument(skip(self))]
    pub async fn xp_to_next_level(&self, guild_id: Snowflake, xp: i64) -> ServiceResult<Option<i64>> {
        let settings = self.get_leveling_settings(guild_id).await?;
        Ok(settings.curve().xp_to_next_level(xp))
    }

    // === Rewards ===

    /// All level rewards of a guild
    #[instrument(skip(self))]
    pub async fn get_leveling_rewards(&self, guild_id: Snowflake) -> ServiceResult<Arc<RewardSet>> {
        let repo = self.ctx.reward_repo();
        let rewards = self
            .ctx
            .cache()
            .get_or_load(&keys::rewards(guild_id), || async move {
                repo.find_by_guild(guild_id)
                    .await
                    .map(|rows| rows.into_iter().collect::<RewardSet>())
            })
            .await?;

        Ok(rewards)
    }

    /// Rewards a member at `level` is entitled to, lowest level first
    #[instrument(skip(self))]
    pub async fn rewards_for_level(&self, guild_id: Snowflake, level: i32) -> ServiceResult<Vec<Reward>> {
        let rewards = self.get_leveling_rewards(guild_id).await?;
        Ok(rewards.earned_at(level).into_iter().cloned().collect())
    }

    /// The next reward above `level`, if any
    #[instrument(skip(self))]
    pub async fn next_reward(&self, guild_id: Snowflake, level: i32) -> ServiceResult<Option<Reward>> {
        let rewards = self.get_leveling_rewards(guild_id).await?;
        Ok(rewards.next_after(level).cloned())
    }

    /// Create or replace the reward of a role
    #[instrument(skip(self, request), fields(role_id = %request.role_id))]
    pub async fn set_leveling_reward(
        &self,
        guild_id: Snowflake,
        request: SetRewardRequest,
    ) -> ServiceResult<Reward> {
        request.validate()?;

        let reward = Reward {
            role_id: request.role_id,
            guild_id,
            level: request.level,
            message: request.message,
        };

        self.ctx.guild_settings_repo().ensure(guild_id).await?;
        self.ctx.reward_repo().upsert(&reward).await?;
        self.ctx.cache().invalidate(&keys::rewards(guild_id));

        info!(guild_id = %guild_id, role_id = %reward.role_id, level = reward.level, "Level reward set");
        Ok(reward)
    }

    /// Remove the reward of a role; `false` if the role had none
    #[instrument(skip(self))]
    pub async fn remove_leveling_reward(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> ServiceResult<bool> {
        let removed = self.ctx.reward_repo().delete(guild_id, role_id).await?;
        self.ctx.cache().invalidate(&keys::rewards(guild_id));

        if removed {
            info!(guild_id = %guild_id, role_id = %role_id, "Level reward removed");
        }
        Ok(removed)
    }
}
