//! Service context - dependency container for services
//!
//! Holds the repositories and the shared settings cache. One context is built
//! at startup and borrowed by every service.

use std::sync::Arc;

use warden_cache::SettingsCache;
use warden_core::traits::{
    GuildSettingsRepository, IgnoreRepository, LockRepository, LogOverrideRepository,
    ModuleSettingsRepository, MuteRepository, RewardRepository, TrackerRepository,
};
use warden_db::{
    PgGuildSettingsRepository, PgIgnoreRepository, PgLockRepository, PgLogOverrideRepository,
    PgModuleSettingsRepository, PgMuteRepository, PgPool, PgRewardRepository,
    PgTrackerRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    guild_settings_repo: Arc<dyn GuildSettingsRepository>,
    module_settings_repo: Arc<dyn ModuleSettingsRepository>,
    ignore_repo: Arc<dyn IgnoreRepository>,
    log_override_repo: Arc<dyn LogOverrideRepository>,
    reward_repo: Arc<dyn RewardRepository>,
    mute_repo: Arc<dyn MuteRepository>,
    lock_repo: Arc<dyn LockRepository>,
    tracker_repo: Arc<dyn TrackerRepository>,

    // Cache
    cache: Arc<SettingsCache>,
}

impl ServiceContext {
    /// Wire the PostgreSQL repositories around one pool
    pub fn from_pool(pool: &PgPool, cache: Arc<SettingsCache>) -> Self {
        Self {
            guild_settings_repo: Arc::new(PgGuildSettingsRepository::new(pool.clone())),
            module_settings_repo: Arc::new(PgModuleSettingsRepository::new(pool.clone())),
            ignore_repo: Arc::new(PgIgnoreRepository::new(pool.clone())),
            log_override_repo: Arc::new(PgLogOverrideRepository::new(pool.clone())),
            reward_repo: Arc::new(PgRewardRepository::new(pool.clone())),
            mute_repo: Arc::new(PgMuteRepository::new(pool.clone())),
            lock_repo: Arc::new(PgLockRepository::new(pool.clone())),
            tracker_repo: Arc::new(PgTrackerRepository::new(pool.clone())),
            cache,
        }
    }

    /// Start assembling a context from individual parts
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn guild_settings_repo(&self) -> &dyn GuildSettingsRepository {
        self.guild_settings_repo.as_ref()
    }

    pub fn module_settings_repo(&self) -> &dyn ModuleSettingsRepository {
        self.module_settings_repo.as_ref()
    }

    pub fn ignore_repo(&self) -> &dyn IgnoreRepository {
        self.ignore_repo.as_ref()
    }

    pub fn log_override_repo(&self) -> &dyn LogOverrideRepository {
        self.log_override_repo.as_ref()
    }

    pub fn reward_repo(&self) -> &dyn RewardRepository {
        self.reward_repo.as_ref()
    }

    pub fn mute_repo(&self) -> &dyn MuteRepository {
        self.mute_repo.as_ref()
    }

    pub fn lock_repo(&self) -> &dyn LockRepository {
        self.lock_repo.as_ref()
    }

    pub fn tracker_repo(&self) -> &dyn TrackerRepository {
        self.tracker_repo.as_ref()
    }

    // === Cache ===

    /// Get the shared settings cache
    pub fn cache(&self) -> &SettingsCache {
        self.cache.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("cached_entries", &self.cache.len())
            .finish()
    }
}

/// Builder for a ServiceContext with custom repositories, used by tests and
/// alternative stores
#[derive(Default)]
pub struct ServiceContextBuilder {
    guild_settings_repo: Option<Arc<dyn GuildSettingsRepository>>,
    module_settings_repo: Option<Arc<dyn ModuleSettingsRepository>>,
    ignore_repo: Option<Arc<dyn IgnoreRepository>>,
    log_override_repo: Option<Arc<dyn LogOverrideRepository>>,
    reward_repo: Option<Arc<dyn RewardRepository>>,
    mute_repo: Option<Arc<dyn MuteRepository>>,
    lock_repo: Option<Arc<dyn LockRepository>>,
    tracker_repo: Option<Arc<dyn TrackerRepository>>,
    cache: Option<Arc<SettingsCache>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guild_settings_repo(mut self, repo: Arc<dyn GuildSettingsRepository>) -> Self {
        self.guild_settings_repo = Some(repo);
        self
    }

    pub fn module_settings_repo(mut self, repo: Arc<dyn ModuleSettingsRepository>) -> Self {
        self.module_settings_repo = Some(repo);
        self
    }

    pub fn ignore_repo(mut self, repo: Arc<dyn IgnoreRepository>) -> Self {
        self.ignore_repo = Some(repo);
        self
    }

    pub fn log_override_repo(mut self, repo: Arc<dyn LogOverrideRepository>) -> Self {
        self.log_override_repo = Some(repo);
        self
    }

    pub fn reward_repo(mut self, repo: Arc<dyn RewardRepository>) -> Self {
        self.reward_repo = Some(repo);
        self
    }

    pub fn mute_repo(mut self, repo: Arc<dyn MuteRepository>) -> Self {
        self.mute_repo = Some(repo);
        self
    }

    pub fn lock_repo(mut self, repo: Arc<dyn LockRepository>) -> Self {
        self.lock_repo = Some(repo);
        self
    }

    pub fn tracker_repo(mut self, repo: Arc<dyn TrackerRepository>) -> Self {
        self.tracker_repo = Some(repo);
        self
    }

    pub fn cache(mut self, cache: Arc<SettingsCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing. A
    /// missing cache is replaced by a default one.
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            guild_settings_repo: required(self.guild_settings_repo, "guild_settings_repo")?,
            module_settings_repo: required(self.module_settings_repo, "module_settings_repo")?,
            ignore_repo: required(self.ignore_repo, "ignore_repo")?,
            log_override_repo: required(self.log_override_repo, "log_override_repo")?,
            reward_repo: required(self.reward_repo, "reward_repo")?,
            mute_repo: required(self.mute_repo, "mute_repo")?,
            lock_repo: required(self.lock_repo, "lock_repo")?,
            tracker_repo: required(self.tracker_repo, "tracker_repo")?,
            cache: self.cache.unwrap_or_default(),
        })
    }
}
