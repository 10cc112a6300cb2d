//! Binding between module settings rows, their cache keys and their
//! repository methods

use std::future::Future;
use std::pin::Pin;

use warden_cache::{keys, CacheKey, SettingsCache};
use warden_core::entities::{
    CommandSettings, LevelingSettings, MessageLogSettings, ModerationSettings, ModuleKind,
    ModuleSettings, UserLogSettings,
};
use warden_core::traits::{ModuleSettingsRepository, RepoResult};
use warden_core::value_objects::Snowflake;

type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = RepoResult<T>> + Send + 'a>>;

/// A settings row that can be read and written through the cache
pub trait CachedSettings: ModuleSettings {
    fn cache_key(guild_id: Snowflake) -> CacheKey<Self>;

    fn find(repo: &dyn ModuleSettingsRepository, guild_id: Snowflake) -> RepoFuture<'_, Option<Self>>;

    fn save<'a>(repo: &'a dyn ModuleSettingsRepository, settings: &'a Self) -> RepoFuture<'a, ()>;
}

impl CachedSettings for LevelingSettings {
    fn cache_key(guild_id: Snowflake) -> CacheKey<Self> {
        keys::leveling_settings(guild_id)
    }

    fn find(repo: &dyn ModuleSettingsRepository, guild_id: Snowflake) -> RepoFuture<'_, Option<Self>> {
        repo.find_leveling(guild_id)
    }

    fn save<'a>(repo: &'a dyn ModuleSettingsRepository, settings: &'a Self) -> RepoFuture<'a, ()> {
        repo.save_leveling(settings)
    }
}

impl CachedSettings for ModerationSettings {
    fn cache_key(guild_id: Snowflake) -> CacheKey<Self> {
        keys::moderation_settings(guild_id)
    }

    fn find(repo: &dyn ModuleSettingsRepository, guild_id: Snowflake) -> RepoFuture<'_, Option<Self>> {
        repo.find_moderation(guild_id)
    }

    fn save<'a>(repo: &'a dyn ModuleSettingsRepository, settings: &'a Self) -> RepoFuture<'a, ()> {
        repo.save_moderation(settings)
    }
}

impl CachedSettings for MessageLogSettings {
    fn cache_key(guild_id: Snowflake) -> CacheKey<Self> {
        keys::message_log_settings(guild_id)
    }

    fn find(repo: &dyn ModuleSettingsRepository, guild_id: Snowflake) -> RepoFuture<'_, Option<Self>> {
        repo.find_message_log(guild_id)
    }

    fn save<'a>(repo: &'a dyn ModuleSettingsRepository, settings: &'a Self) -> RepoFuture<'a, ()> {
        repo.save_message_log(settings)
    }
}

impl CachedSettings for UserLogSettings {
    fn cache_key(guild_id: Snowflake) -> CacheKey<Self> {
        keys::user_log_settings(guild_id)
    }

    fn find(repo: &dyn ModuleSettingsRepository, guild_id: Snowflake) -> RepoFuture<'_, Option<Self>> {
        repo.find_user_log(guild_id)
    }

    fn save<'a>(repo: &'a dyn ModuleSettingsRepository, settings: &'a Self) -> RepoFuture<'a, ()> {
        repo.save_user_log(settings)
    }
}

impl CachedSettings for CommandSettings {
    fn cache_key(guild_id: Snowflake) -> CacheKey<Self> {
        keys::command_settings(guild_id)
    }

    fn find(repo: &dyn ModuleSettingsRepository, guild_id: Snowflake) -> RepoFuture<'_, Option<Self>> {
        repo.find_commands(guild_id)
    }

    fn save<'a>(repo: &'a dyn ModuleSettingsRepository, settings: &'a Self) -> RepoFuture<'a, ()> {
        repo.save_commands(settings)
    }
}

/// Drop every cached value derived from a module's settings row
pub fn invalidate_module(cache: &SettingsCache, module: ModuleKind, guild_id: Snowflake) {
    cache.invalidate(&keys::module_enabled(module, guild_id));
    match module {
        ModuleKind::General => {}
        ModuleKind::Leveling => cache.invalidate(&keys::leveling_settings(guild_id)),
        ModuleKind::Moderation => cache.invalidate(&keys::moderation_settings(guild_id)),
        ModuleKind::MessageLog => cache.invalidate(&keys::message_log_settings(guild_id)),
        ModuleKind::UserLog => cache.invalidate(&keys::user_log_settings(guild_id)),
        ModuleKind::Commands => cache.invalidate(&keys::command_settings(guild_id)),
    }
}
