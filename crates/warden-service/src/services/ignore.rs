//! Ignore resolver
//!
//! Decides whether a message earns XP. Members, channels and roles are kept
//! in three separately cached sets per guild so a change to one category
//! never evicts the other two.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, instrument};
use warden_cache::keys;
use warden_core::entities::{IgnoreCategory, IgnoredItems, ModuleKind};
use warden_core::Snowflake;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::module::ModuleService;

/// Ignore resolver service
pub struct IgnoreService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IgnoreService<'a> {
    /// Create a new IgnoreService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn ignored_set(
        &self,
        category: IgnoreCategory,
        guild_id: Snowflake,
    ) -> ServiceResult<Arc<HashSet<Snowflake>>> {
        let repo = self.ctx.ignore_repo();
        let ids = self
            .ctx
            .cache()
            .get_or_load(&keys::ignored(category, guild_id), || async move {
                repo.find_ids(category, guild_id).await
            })
            .await?;

        Ok(ids)
    }

    /// Check whether a message is exempt from XP
    ///
    /// A guild with leveling switched off ignores every message.
    #[instrument(skip(self, role_ids))]
    pub async fn is_message_ignored(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
        channel_id: Snowflake,
    ) -> ServiceResult<bool> {
        if !ModuleService::new(self.ctx)
            .is_module_enabled(ModuleKind::Leveling, guild_id)
            .await?
        {
            return Ok(true);
        }

        if self
            .ignored_set(IgnoreCategory::Member, guild_id)
            .await?
            .contains(&user_id)
        {
            return Ok(true);
        }

        if self
            .ignored_set(IgnoreCategory::Channel, guild_id)
            .await?
            .contains(&channel_id)
        {
            return Ok(true);
        }

        if role_ids.is_empty() {
            return Ok(false);
        }
        let roles = self.ignored_set(IgnoreCategory::Role, guild_id).await?;
        Ok(role_ids.iter().any(|role| roles.contains(role)))
    }

    /// All ignore rules of a guild
    #[instrument(skip(self))]
    pub async fn get_ignored_items(&self, guild_id: Snowflake) -> ServiceResult<IgnoredItems> {
        Ok(IgnoredItems {
            members: (*self.ignored_set(IgnoreCategory::Member, guild_id).await?).clone(),
            channels: (*self.ignored_set(IgnoreCategory::Channel, guild_id).await?).clone(),
            roles: (*self.ignored_set(IgnoreCategory::Role, guild_id).await?).clone(),
        })
    }

    /// Add ignore rules; ids that are already ignored are skipped
    #[instrument(skip(self, members, channels, roles))]
    pub async fn add_ignored_items(
        &self,
        guild_id: Snowflake,
        members: &[Snowflake],
        channels: &[Snowflake],
        roles: &[Snowflake],
    ) -> ServiceResult<()> {
        let mut guild_ensured = false;

        for (category, ids) in [
            (IgnoreCategory::Member, members),
            (IgnoreCategory::Channel, channels),
            (IgnoreCategory::Role, roles),
        ] {
            if ids.is_empty() {
                continue;
            }

            let current = self.ignored_set(category, guild_id).await?;
            let added = pick(ids, |id| !current.contains(id));
            if added.is_empty() {
                continue;
            }

            if !guild_ensured {
                self.ctx.guild_settings_repo().ensure(guild_id).await?;
                guild_ensured = true;
            }
            self.ctx
                .ignore_repo()
                .insert_many(category, guild_id, &added)
                .await?;
            self.ctx.cache().invalidate(&keys::ignored(category, guild_id));

            info!(guild_id = %guild_id, category = %category, count = added.len(), "Ignore rules added");
        }

        Ok(())
    }

    /// Remove ignore rules; ids that are not ignored are skipped
    #[instrument(skip(self, members, channels, roles))]
    pub async fn remove_ignored_items(
        &self,
        guild_id: Snowflake,
        members: &[Snowflake],
        channels: &[Snowflake],
        roles: &[Snowflake],
    ) -> ServiceResult<()> {
        for (category, ids) in [
            (IgnoreCategory::Member, members),
            (IgnoreCategory::Channel, channels),
            (IgnoreCategory::Role, roles),
        ] {
            if ids.is_empty() {
                continue;
            }

            let current = self.ignored_set(category, guild_id).await?;
            let removed = pick(ids, |id| current.contains(id));
            if removed.is_empty() {
                continue;
            }

            self.ctx
                .ignore_repo()
                .delete_many(category, guild_id, &removed)
                .await?;
            self.ctx.cache().invalidate(&keys::ignored(category, guild_id));

            info!(guild_id = %guild_id, category = %category, count = removed.len(), "Ignore rules removed");
        }

        Ok(())
    }
}

/// Distinct ids accepted by `keep`, in input order
fn pick(ids: &[Snowflake], keep: impl Fn(&Snowflake) -> bool) -> Vec<Snowflake> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .copied()
        .filter(|id| keep(id) && seen.insert(*id))
        .collect()
}
