//! Mute service
//!
//! A member has at most one mute row. Muting an already muted member
//! replaces the old row instead of extending it.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use warden_core::entities::{Expiring, Mute};
use warden_core::Snowflake;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Mute service
pub struct MuteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MuteService<'a> {
    /// Create a new MuteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mute a member, returning the mute it replaced
    #[instrument(skip(self, mute), fields(guild_id = %mute.guild_id, user_id = %mute.user_id))]
    pub async fn add_mute(&self, mute: Mute) -> ServiceResult<Option<Mute>> {
        self.ctx.guild_settings_repo().ensure(mute.guild_id).await?;

        let replaced = self.ctx.mute_repo().replace(&mute).await?;

        info!(
            guild_id = %mute.guild_id,
            user_id = %mute.user_id,
            sin_id = mute.sin_id,
            end_time = %mute.end_time,
            replaced = replaced.is_some(),
            "Member muted"
        );
        Ok(replaced)
    }

    /// Lift a mute, returning it if the member was muted
    #[instrument(skip(self))]
    pub async fn remove_mute(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Option<Mute>> {
        let removed = self.ctx.mute_repo().delete(guild_id, user_id).await?;

        if removed.is_some() {
            info!(guild_id = %guild_id, user_id = %user_id, "Member unmuted");
        }
        Ok(removed)
    }

    /// Remove every mute that ended at or before `now`
    ///
    /// The caller lifts the platform-side mute for each returned row.
    #[instrument(skip(self))]
    pub async fn remove_expired_mutes(&self, now: DateTime<Utc>) -> ServiceResult<Vec<Mute>> {
        let expired = self.ctx.mute_repo().delete_expired(now).await?;

        if !expired.is_empty() {
            info!(count = expired.len(), "Expired mutes removed");
        }
        Ok(expired)
    }

    /// Check whether a member is muted right now
    #[instrument(skip(self))]
    pub async fn is_member_muted(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<bool> {
        let active = self
            .ctx
            .mute_repo()
            .find_active(guild_id, user_id, Utc::now())
            .await?;
        Ok(active.is_some())
    }

    /// The mute row of a member, even if it already ended
    #[instrument(skip(self))]
    pub async fn get_mute(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<Option<Mute>> {
        Ok(self.ctx.mute_repo().find(guild_id, user_id).await?)
    }

    /// Mutes of a guild that have not ended yet
    #[instrument(skip(self))]
    pub async fn get_active_mutes(&self, guild_id: Snowflake) -> ServiceResult<Vec<Mute>> {
        let now = Utc::now();
        let mutes = self.ctx.mute_repo().find_by_guild(guild_id).await?;
        Ok(mutes.into_iter().filter(|m| !m.is_expired_at(now)).collect())
    }
}
