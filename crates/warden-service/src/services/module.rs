//! Module gate
//!
//! Answers whether a feature module is switched on for a guild and owns the
//! cached reads and writes of the modules' settings rows. Every other
//! resolver consults the gate before doing any work of its own.

use std::sync::Arc;

use tracing::{debug, info, instrument};
use warden_cache::keys;
use warden_core::entities::ModuleKind;
use warden_core::Snowflake;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::settings::{invalidate_module, CachedSettings};

/// Module gate service
pub struct ModuleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModuleService<'a> {
    /// Create a new ModuleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check whether a module is enabled; a guild without a row has it off
    #[instrument(skip(self))]
    pub async fn is_module_enabled(
        &self,
        module: ModuleKind,
        guild_id: Snowflake,
    ) -> ServiceResult<bool> {
        if module.is_always_enabled() {
            return Ok(true);
        }

        let repo = self.ctx.module_settings_repo();
        let enabled = self
            .ctx
            .cache()
            .get_or_load(&keys::module_enabled(module, guild_id), || async move {
                repo.find_module_enabled(module, guild_id)
                    .await
                    .map(|row| row.unwrap_or(false))
            })
            .await?;

        Ok(*enabled)
    }

    /// Switch a module on or off, creating the guild and module rows if needed
    #[instrument(skip(self))]
    pub async fn set_module_state(
        &self,
        module: ModuleKind,
        guild_id: Snowflake,
        enabled: bool,
    ) -> ServiceResult<()> {
        if module.is_always_enabled() {
            debug!(guild_id = %guild_id, module = %module, "Ignoring state change of always-on module");
            return Ok(());
        }

        self.ctx.guild_settings_repo().ensure(guild_id).await?;
        self.ctx
            .module_settings_repo()
            .set_module_enabled(module, guild_id, enabled)
            .await?;
        invalidate_module(self.ctx.cache(), module, guild_id);

        info!(guild_id = %guild_id, module = %module, enabled, "Module state changed");
        Ok(())
    }

    /// Enabled flag of every module, each read from its own settings row
    #[instrument(skip(self))]
    pub async fn get_all_module_states(
        &self,
        guild_id: Snowflake,
    ) -> ServiceResult<Vec<(ModuleKind, bool)>> {
        let mut states = Vec::with_capacity(ModuleKind::CONFIGURABLE.len() + 1);
        states.push((ModuleKind::General, true));
        for module in ModuleKind::CONFIGURABLE {
            states.push((module, self.is_module_enabled(module, guild_id).await?));
        }
        Ok(states)
    }

    /// Settings row of a module, or its defaults when the guild has none
    #[instrument(skip(self), fields(module = %S::MODULE))]
    pub async fn get_settings<S: CachedSettings>(&self, guild_id: Snowflake) -> ServiceResult<Arc<S>> {
        let repo = self.ctx.module_settings_repo();
        let settings = self
            .ctx
            .cache()
            .get_or_load(&S::cache_key(guild_id), || async move {
                S::find(repo, guild_id)
                    .await
                    .map(|row| row.unwrap_or_else(|| S::default_for(guild_id)))
            })
            .await?;

        Ok(settings)
    }

    /// Persist a full settings row, enabled flag included
    #[instrument(skip(self, settings), fields(module = %S::MODULE, guild_id = %settings.guild_id()))]
    pub async fn save_settings<S: CachedSettings>(&self, settings: &S) -> ServiceResult<()> {
        let guild_id = settings.guild_id();

        self.ctx.guild_settings_repo().ensure(guild_id).await?;
        S::save(self.ctx.module_settings_repo(), settings).await?;
        invalidate_module(self.ctx.cache(), S::MODULE, guild_id);

        debug!(guild_id = %guild_id, module = %S::MODULE, "Module settings saved");
        Ok(())
    }
}
