//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Absent rows are `None` or empty collections,
//! never errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::entities::{
    ChannelLogOverride, CommandSettings, GuildSettings, IgnoreCategory, LevelingSettings, Lock,
    MessageLogSettings, ModerationSettings, ModuleKind, Mute, Reward, Tracker, UserLogSettings,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Guild Settings Repository
// ============================================================================

#[async_trait]
pub trait GuildSettingsRepository: Send + Sync {
    /// Find the guild row
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>>;

    /// Insert the guild row if it does not exist yet
    async fn ensure(&self, guild_id: Snowflake) -> RepoResult<()>;

    /// Set or clear the general log channel
    async fn set_log_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> RepoResult<()>;
}

// ============================================================================
// Module Settings Repository
// ============================================================================

#[async_trait]
pub trait ModuleSettingsRepository: Send + Sync {
    /// Read a module's enabled flag from the module's own table
    ///
    /// `ModuleKind::General` has no table and yields
    /// `DomainError::ModuleWithoutSettings`.
    async fn find_module_enabled(
        &self,
        module: ModuleKind,
        guild_id: Snowflake,
    ) -> RepoResult<Option<bool>>;

    /// Create the module row if absent and set its enabled flag
    async fn set_module_enabled(
        &self,
        module: ModuleKind,
        guild_id: Snowflake,
        enabled: bool,
    ) -> RepoResult<()>;

    async fn find_leveling(&self, guild_id: Snowflake) -> RepoResult<Option<LevelingSettings>>;

    /// Insert or replace the leveling row
    async fn save_leveling(&self, settings: &LevelingSettings) -> RepoResult<()>;

    async fn find_moderation(&self, guild_id: Snowflake)
        -> RepoResult<Option<ModerationSettings>>;

    async fn save_moderation(&self, settings: &ModerationSettings) -> RepoResult<()>;

    async fn find_message_log(&self, guild_id: Snowflake)
        -> RepoResult<Option<MessageLogSettings>>;

    async fn save_message_log(&self, settings: &MessageLogSettings) -> RepoResult<()>;

    async fn find_user_log(&self, guild_id: Snowflake) -> RepoResult<Option<UserLogSettings>>;

    async fn save_user_log(&self, settings: &UserLogSettings) -> RepoResult<()>;

    async fn find_commands(&self, guild_id: Snowflake) -> RepoResult<Option<CommandSettings>>;

    async fn save_commands(&self, settings: &CommandSettings) -> RepoResult<()>;
}

// ============================================================================
// Ignore Repository
// ============================================================================

#[async_trait]
pub trait IgnoreRepository: Send + Sync {
    /// All ignored ids of one category in a guild
    async fn find_ids(
        &self,
        category: IgnoreCategory,
        guild_id: Snowflake,
    ) -> RepoResult<HashSet<Snowflake>>;

    /// Insert ids, ignoring ones already present
    async fn insert_many(
        &self,
        category: IgnoreCategory,
        guild_id: Snowflake,
        ids: &[Snowflake],
    ) -> RepoResult<()>;

    /// Delete ids, ignoring ones not present
    async fn delete_many(
        &self,
        category: IgnoreCategory,
        guild_id: Snowflake,
        ids: &[Snowflake],
    ) -> RepoResult<()>;
}

// ============================================================================
// Log Override Repository
// ============================================================================

#[async_trait]
pub trait LogOverrideRepository: Send + Sync {
    /// Find the override of a channel
    async fn find(&self, channel_id: Snowflake) -> RepoResult<Option<ChannelLogOverride>>;

    /// All overrides of a guild
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<ChannelLogOverride>>;

    /// Insert or replace the single override of a channel
    async fn upsert(&self, log_override: &ChannelLogOverride) -> RepoResult<()>;

    /// Delete the override of a channel, returning whether a row existed
    async fn delete(&self, channel_id: Snowflake, guild_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Reward Repository
// ============================================================================

#[async_trait]
pub trait RewardRepository: Send + Sync {
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Reward>>;

    /// Insert or replace the reward for a role
    async fn upsert(&self, reward: &Reward) -> RepoResult<()>;

    /// Delete the reward for a role, returning whether a row existed
    async fn delete(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Mute Repository
// ============================================================================

#[async_trait]
pub trait MuteRepository: Send + Sync {
    /// Find the mute row of a member, expired or not
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Mute>>;

    /// Find a mute of a member whose end time is after `now`
    async fn find_active(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Mute>>;

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Mute>>;

    /// Store a mute in place of the member's current one, returning the replaced row
    ///
    /// Delete and insert happen atomically: on error the previous mute is kept.
    async fn replace(&self, mute: &Mute) -> RepoResult<Option<Mute>>;

    /// Delete the mute of a member and return it
    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Mute>>;

    /// Delete every mute with `end_time <= now` and return them
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<Mute>>;
}

// ============================================================================
// Lock Repository
// ============================================================================

#[async_trait]
pub trait LockRepository: Send + Sync {
    async fn find(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<Option<Lock>>;

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Lock>>;

    /// Insert a lock, or renew the moderator, end time and reason of an existing one
    ///
    /// An existing row keeps its permission snapshot. Returns the stored row.
    async fn upsert(&self, lock: &Lock) -> RepoResult<Lock>;

    async fn delete(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<Option<Lock>>;

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<Lock>>;
}

// ============================================================================
// Tracker Repository
// ============================================================================

#[async_trait]
pub trait TrackerRepository: Send + Sync {
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Tracker>>;

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Tracker>>;

    /// Insert a tracker, or overwrite channel, moderator and end time of an existing one
    async fn upsert(&self, tracker: &Tracker) -> RepoResult<Tracker>;

    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake)
        -> RepoResult<Option<Tracker>>;

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<Tracker>>;
}
