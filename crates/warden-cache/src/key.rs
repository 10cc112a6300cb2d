//! Typed cache keys
//!
//! A key string is derived from a category and an id, and the key's type
//! parameter fixes the value type stored under it. Every constructor in
//! [`keys`] uses a distinct category prefix, so one string never maps to two
//! value types.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

/// A cache key that can only hold values of type `T`
pub struct CacheKey<T> {
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CacheKey<T> {
    /// Build a key from a category and an id
    pub fn new(category: &str, id: impl fmt::Display) -> Self {
        Self {
            key: format!("{category}:{id}"),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl<T> Clone for CacheKey<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for CacheKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheKey").field(&self.key).finish()
    }
}

impl<T> fmt::Display for CacheKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl<T> PartialEq for CacheKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for CacheKey<T> {}

/// Key constructors for everything the services cache
pub mod keys {
    use super::{CacheKey, HashSet};
    use warden_core::entities::{
        CommandSettings, GuildSettings, IgnoreCategory, LevelingSettings, LogOverride,
        MessageLogSettings, ModerationSettings, ModuleKind, RewardSet, UserLogSettings,
    };
    use warden_core::value_objects::Snowflake;

    pub fn guild_settings(guild_id: Snowflake) -> CacheKey<Option<GuildSettings>> {
        CacheKey::new("guild", guild_id)
    }

    pub fn module_enabled(module: ModuleKind, guild_id: Snowflake) -> CacheKey<bool> {
        CacheKey::new(&format!("module_enabled:{}", module.as_str()), guild_id)
    }

    pub fn leveling_settings(guild_id: Snowflake) -> CacheKey<LevelingSettings> {
        CacheKey::new("settings:leveling", guild_id)
    }

    pub fn moderation_settings(guild_id: Snowflake) -> CacheKey<ModerationSettings> {
        CacheKey::new("settings:moderation", guild_id)
    }

    pub fn message_log_settings(guild_id: Snowflake) -> CacheKey<MessageLogSettings> {
        CacheKey::new("settings:message_log", guild_id)
    }

    pub fn user_log_settings(guild_id: Snowflake) -> CacheKey<UserLogSettings> {
        CacheKey::new("settings:user_log", guild_id)
    }

    pub fn command_settings(guild_id: Snowflake) -> CacheKey<CommandSettings> {
        CacheKey::new("settings:commands", guild_id)
    }

    pub fn ignored(category: IgnoreCategory, guild_id: Snowflake) -> CacheKey<HashSet<Snowflake>> {
        CacheKey::new(&format!("ignored:{}", category.as_str()), guild_id)
    }

    /// Overrides are keyed by channel alone; a channel belongs to one guild
    pub fn log_override(channel_id: Snowflake) -> CacheKey<LogOverride> {
        CacheKey::new("log_override", channel_id)
    }

    pub fn rewards(guild_id: Snowflake) -> CacheKey<RewardSet> {
        CacheKey::new("rewards", guild_id)
    }

    pub fn locked_channels(guild_id: Snowflake) -> CacheKey<HashSet<Snowflake>> {
        CacheKey::new("locked_channels", guild_id)
    }

    pub fn tracked_members(guild_id: Snowflake) -> CacheKey<HashSet<Snowflake>> {
        CacheKey::new("tracked_members", guild_id)
    }
}
