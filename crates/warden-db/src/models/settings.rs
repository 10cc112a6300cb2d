//! Module settings database models

use sqlx::FromRow;

/// Database model for leveling_settings table
#[derive(Debug, Clone, FromRow)]
pub struct LevelingSettingsModel {
    pub guild_id: i64,
    pub module_enabled: bool,
    pub base: i64,
    pub modifier: i64,
    pub amount: i64,
    pub text_time: i64,
    pub level_channel_log_id: Option<i64>,
}

/// Database model for moderation_settings table
#[derive(Debug, Clone, FromRow)]
pub struct ModerationSettingsModel {
    pub guild_id: i64,
    pub module_enabled: bool,
    pub mute_role_id: Option<i64>,
    pub log_channel_id: Option<i64>,
}

/// Shared shape of message_log_settings and user_log_settings
#[derive(Debug, Clone, FromRow)]
pub struct LogSettingsModel {
    pub guild_id: i64,
    pub module_enabled: bool,
    pub log_channel_id: Option<i64>,
}

/// Database model for command_settings table
#[derive(Debug, Clone, FromRow)]
pub struct CommandSettingsModel {
    pub guild_id: i64,
    pub module_enabled: bool,
    pub prefix: Option<String>,
}
