//! Tracker service
//!
//! Trackers mirror a member's activity into a moderator-chosen channel for a
//! limited time. Tracking an already tracked member retargets the existing
//! tracker.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use warden_cache::keys;
use warden_core::entities::{Expiring, Tracker};
use warden_core::Snowflake;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Tracker service
pub struct TrackerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TrackerService<'a> {
    /// Create a new TrackerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn tracked_members(&self, guild_id: Snowflake) -> ServiceResult<Arc<HashSet<Snowflake>>> {
        let repo = self.ctx.tracker_repo();
        let members = self
            .ctx
            .cache()
            .get_or_load(&keys::tracked_members(guild_id), || async move {
                repo.find_by_guild(guild_id)
                    .await
                    .map(|rows| rows.into_iter().map(|t| t.user_id).collect::<HashSet<_>>())
            })
            .await?;

        Ok(members)
    }

    /// Start tracking a member, or retarget the member's tracker
    #[instrument(skip(self, tracker), fields(guild_id = %tracker.guild_id, user_id = %tracker.user_id))]
    pub async fn add_tracker(&self, tracker: Tracker) -> ServiceResult<Tracker> {
        self.ctx.guild_settings_repo().ensure(tracker.guild_id).await?;
        let stored = self.ctx.tracker_repo().upsert(&tracker).await?;
        self.ctx.cache().invalidate(&keys::tracked_members(stored.guild_id));

        info!(
            guild_id = %stored.guild_id,
            user_id = %stored.user_id,
            log_channel_id = %stored.log_channel_id,
            end_time = %stored.end_time,
            "Member tracked"
        );
        Ok(stored)
    }

    /// Stop tracking a member
    #[instrument(skip(self))]
    pub async fn remove_tracker(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Option<Tracker>> {
        let removed = self.ctx.tracker_repo().delete(guild_id, user_id).await?;
        self.ctx.cache().invalidate(&keys::tracked_members(guild_id));

        if removed.is_some() {
            info!(guild_id = %guild_id, user_id = %user_id, "Tracker removed");
        }
        Ok(removed)
    }

    /// Remove every tracker that ended at or before `now`
    #[instrument(skip(self))]
    pub async fn remove_expired_trackers(&self, now: DateTime<Utc>) -> ServiceResult<Vec<Tracker>> {
        let expired = self.ctx.tracker_repo().delete_expired(now).await?;

        let guilds: HashSet<Snowflake> = expired.iter().map(|t| t.guild_id).collect();
        for guild_id in guilds {
            self.ctx.cache().invalidate(&keys::tracked_members(guild_id));
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "Expired trackers removed");
        }
        Ok(expired)
    }

    #[instrument(skip(self))]
    pub async fn is_member_tracked(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<bool> {
        Ok(self.tracked_members(guild_id).await?.contains(&user_id))
    }

    #[instrument(skip(self))]
    pub async fn get_tracker(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Option<Tracker>> {
        Ok(self.ctx.tracker_repo().find(guild_id, user_id).await?)
    }

    /// Trackers of a guild that have not ended yet
    #[instrument(skip(self))]
    pub async fn get_active_trackers(&self, guild_id: Snowflake) -> ServiceResult<Vec<Tracker>> {
        let now = Utc::now();
        let trackers = self.ctx.tracker_repo().find_by_guild(guild_id).await?;
        Ok(trackers.into_iter().filter(|t| !t.is_expired_at(now)).collect())
    }
}
