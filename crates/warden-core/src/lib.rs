//! # warden-core
//!
//! Domain layer containing settings entities, moderation state, value objects,
//! repository traits, and the leveling curve.
//! This crate has zero dependencies on infrastructure (database, cache, etc.).

pub mod entities;
pub mod error;
pub mod leveling;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ChannelLogOverride, CommandSettings, Expiring, GuildSettings, IgnoreCategory, IgnoredItems,
    LevelingSettings, Lock, LogOverride, LogType, MessageLogSettings, ModerationSettings,
    ModuleKind, ModuleSettings, Mute, OverrideOption, Reward, RewardSet, Tracker,
    UserLogSettings,
};
pub use error::DomainError;
pub use leveling::{LevelCurve, MAX_LEVEL};
pub use traits::{
    GuildSettingsRepository, IgnoreRepository, LockRepository, LogOverrideRepository,
    ModuleSettingsRepository, MuteRepository, RepoResult, RewardRepository, TrackerRepository,
};
pub use value_objects::{Permissions, Snowflake, SnowflakeParseError};
