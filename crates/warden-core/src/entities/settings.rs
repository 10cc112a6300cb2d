//! Per-module settings rows
//!
//! One row per guild per module. Rows are created lazily on first write; a
//! guild with no row reads the `default_for` value, which is disabled.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::leveling::LevelCurve;
use crate::value_objects::Snowflake;

use super::module::ModuleKind;

/// Common shape of every module settings row
pub trait ModuleSettings: Clone + Send + Sync + 'static {
    /// The module this row belongs to
    const MODULE: ModuleKind;

    /// Unconfigured row for a guild
    fn default_for(guild_id: Snowflake) -> Self;

    fn guild_id(&self) -> Snowflake;

    fn module_enabled(&self) -> bool;
}

/// Leveling module settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LevelingSettings {
    pub guild_id: Snowflake,
    pub module_enabled: bool,
    /// XP needed for level 2 and the baseline of the curve
    #[validate(range(min = 1, message = "Base must be at least 1"))]
    pub base: i64,
    /// Curve steepness, in percent of `base`
    #[validate(range(min = 0, max = 1000, message = "Modifier must be 0-1000"))]
    pub modifier: i64,
    /// XP granted per eligible message
    #[validate(range(min = 0, message = "Amount must not be negative"))]
    pub amount: i64,
    /// Cooldown between XP grants per member, in seconds
    #[validate(range(min = 0, message = "Text time must not be negative"))]
    pub text_time: i64,
    /// Channel receiving level-up announcements
    pub level_channel_log_id: Option<Snowflake>,
}

impl LevelingSettings {
    pub const DEFAULT_BASE: i64 = 15;
    pub const DEFAULT_MODIFIER: i64 = 50;
    pub const DEFAULT_AMOUNT: i64 = 5;
    pub const DEFAULT_TEXT_TIME: i64 = 60;

    /// The XP curve described by these settings
    pub fn curve(&self) -> LevelCurve {
        LevelCurve::new(self.base, self.modifier)
    }
}

impl ModuleSettings for LevelingSettings {
    const MODULE: ModuleKind = ModuleKind::Leveling;

    fn default_for(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            module_enabled: false,
            base: Self::DEFAULT_BASE,
            modifier: Self::DEFAULT_MODIFIER,
            amount: Self::DEFAULT_AMOUNT,
            text_time: Self::DEFAULT_TEXT_TIME,
            level_channel_log_id: None,
        }
    }

    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn module_enabled(&self) -> bool {
        self.module_enabled
    }
}

/// Moderation module settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationSettings {
    pub guild_id: Snowflake,
    pub module_enabled: bool,
    /// Role applied to muted members
    pub mute_role_id: Option<Snowflake>,
    pub log_channel_id: Option<Snowflake>,
}

impl ModuleSettings for ModerationSettings {
    const MODULE: ModuleKind = ModuleKind::Moderation;

    fn default_for(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            module_enabled: false,
            mute_role_id: None,
            log_channel_id: None,
        }
    }

    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn module_enabled(&self) -> bool {
        self.module_enabled
    }
}

/// Message log module settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLogSettings {
    pub guild_id: Snowflake,
    pub module_enabled: bool,
    pub log_channel_id: Option<Snowflake>,
}

impl ModuleSettings for MessageLogSettings {
    const MODULE: ModuleKind = ModuleKind::MessageLog;

    fn default_for(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            module_enabled: false,
            log_channel_id: None,
        }
    }

    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn module_enabled(&self) -> bool {
        self.module_enabled
    }
}

/// User log module settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLogSettings {
    pub guild_id: Snowflake,
    pub module_enabled: bool,
    pub log_channel_id: Option<Snowflake>,
}

impl ModuleSettings for UserLogSettings {
    const MODULE: ModuleKind = ModuleKind::UserLog;

    fn default_for(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            module_enabled: false,
            log_channel_id: None,
        }
    }

    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn module_enabled(&self) -> bool {
        self.module_enabled
    }
}

/// Commands module settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommandSettings {
    pub guild_id: Snowflake,
    pub module_enabled: bool,
    /// Text prefix for message commands; `None` means mention only
    #[validate(length(min = 1, max = 8, message = "Prefix must be 1-8 characters"))]
    pub prefix: Option<String>,
}

impl ModuleSettings for CommandSettings {
    const MODULE: ModuleKind = ModuleKind::Commands;

    fn default_for(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            module_enabled: false,
            prefix: None,
        }
    }

    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn module_enabled(&self) -> bool {
        self.module_enabled
    }
}
