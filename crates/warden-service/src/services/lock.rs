//! Channel lock service
//!
//! A lock remembers the `@everyone` overwrite it replaced so the channel can
//! be restored on unlock. Re-locking a locked channel only renews its terms;
//! the snapshot taken by the first lock stays authoritative.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use warden_cache::keys;
use warden_core::entities::{Expiring, Lock};
use warden_core::Snowflake;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Channel lock service
pub struct LockService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LockService<'a> {
    /// Create a new LockService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn locked_channels(&self, guild_id: Snowflake) -> ServiceResult<Arc<HashSet<Snowflake>>> {
        let repo = self.ctx.lock_repo();
        let channels = self
            .ctx
            .cache()
            .get_or_load(&keys::locked_channels(guild_id), || async move {
                repo.find_by_guild(guild_id)
                    .await
                    .map(|locks| locks.into_iter().map(|l| l.channel_id).collect::<HashSet<_>>())
            })
            .await?;

        Ok(channels)
    }

    /// Lock a channel or renew an existing lock
    ///
    /// Returns the stored lock, which carries the original permission
    /// snapshot when the channel was already locked.
    #[instrument(skip(self, lock), fields(guild_id = %lock.guild_id, channel_id = %lock.channel_id))]
    pub async fn add_lock(&self, lock: Lock) -> ServiceResult<Lock> {
        let repo = self.ctx.lock_repo();
        let existing = repo.find(lock.guild_id, lock.channel_id).await?;

        if let Some(current) = existing.filter(|current| {
            current.previously_allowed != lock.previously_allowed
                || current.previously_denied != lock.previously_denied
        }) {
            warn!(
                guild_id = %lock.guild_id,
                channel_id = %lock.channel_id,
                kept_allowed = ?current.previously_allowed,
                kept_denied = ?current.previously_denied,
                "Re-lock supplied a different permission snapshot; keeping the original"
            );
        }

        self.ctx.guild_settings_repo().ensure(lock.guild_id).await?;
        let stored = repo.upsert(&lock).await?;
        self.ctx.cache().invalidate(&keys::locked_channels(stored.guild_id));

        info!(
            guild_id = %stored.guild_id,
            channel_id = %stored.channel_id,
            moderator_id = %stored.moderator_id,
            end_time = %stored.end_time,
            "Channel locked"
        );
        Ok(stored)
    }

    /// Unlock a channel, returning the lock and its snapshot
    #[instrument(skip(self))]
    pub async fn remove_lock(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<Option<Lock>> {
        let removed = self.ctx.lock_repo().delete(guild_id, channel_id).await?;
        self.ctx.cache().invalidate(&keys::locked_channels(guild_id));

        if removed.is_some() {
            info!(guild_id = %guild_id, channel_id = %channel_id, "Channel unlocked");
        }
        Ok(removed)
    }

    /// Remove every lock that ended at or before `now`
    ///
    /// The caller restores the channel overwrite of each returned row.
    #[instrument(skip(self))]
    pub async fn remove_expired_locks(&self, now: DateTime<Utc>) -> ServiceResult<Vec<Lock>> {
        let expired = self.ctx.lock_repo().delete_expired(now).await?;

        let guilds: HashSet<Snowflake> = expired.iter().map(|l| l.guild_id).collect();
        for guild_id in guilds {
            self.ctx.cache().invalidate(&keys::locked_channels(guild_id));
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "Expired locks removed");
        }
        Ok(expired)
    }

    /// Check whether a channel is locked
    #[instrument(skip(self))]
    pub async fn is_channel_locked(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<bool> {
        Ok(self.locked_channels(guild_id).await?.contains(&channel_id))
    }

    #[instrument(skip(self))]
    pub async fn get_lock(&self, guild_id: Snowflake, channel_id: Snowflake) -> ServiceResult<Option<Lock>> {
        Ok(self.ctx.lock_repo().find(guild_id, channel_id).await?)
    }

    /// Locks of a guild that have not ended yet
    #[instrument(skip(self))]
    pub async fn get_active_locks(&self, guild_id: Snowflake) -> ServiceResult<Vec<Lock>> {
        let now = Utc::now();
        let locks = self.ctx.lock_repo().find_by_guild(guild_id).await?;
        Ok(locks.into_iter().filter(|l| !l.is_expired_at(now)).collect())
    }
}
