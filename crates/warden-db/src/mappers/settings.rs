//! Guild and module settings model -> entity mappers

use warden_core::entities::{
    CommandSettings, GuildSettings, LevelingSettings, MessageLogSettings, ModerationSettings,
    UserLogSettings,
};
use warden_core::value_objects::Snowflake;

use crate::models::{
    CommandSettingsModel, GuildSettingsModel, LevelingSettingsModel, LogSettingsModel,
    ModerationSettingsModel,
};

impl From<GuildSettingsModel> for GuildSettings {
    fn from(model: GuildSettingsModel) -> Self {
        GuildSettings {
            guild_id: Snowflake::from_db(model.guild_id),
            log_channel_id: model.log_channel_id.map(Snowflake::from_db),
            created_at: model.created_at,
        }
    }
}

impl From<LevelingSettingsModel> for LevelingSettings {
    fn from(model: LevelingSettingsModel) -> Self {
        LevelingSettings {
            guild_id: Snowflake::from_db(model.guild_id),
            module_enabled: model.module_enabled,
            base: model.base,
            modifier: model.modifier,
            amount: model.amount,
            text_time: model.text_time,
            level_channel_log_id: model.level_channel_log_id.map(Snowflake::from_db),
        }
    }
}

impl From<ModerationSettingsModel> for ModerationSettings {
    fn from(model: ModerationSettingsModel) -> Self {
        ModerationSettings {
            guild_id: Snowflake::from_db(model.guild_id),
            module_enabled: model.module_enabled,
            mute_role_id: model.mute_role_id.map(Snowflake::from_db),
            log_channel_id: model.log_channel_id.map(Snowflake::from_db),
        }
    }
}

impl From<LogSettingsModel> for MessageLogSettings {
    fn from(model: LogSettingsModel) -> Self {
        MessageLogSettings {
            guild_id: Snowflake::from_db(model.guild_id),
            module_enabled: model.module_enabled,
            log_channel_id: model.log_channel_id.map(Snowflake::from_db),
        }
    }
}

impl From<LogSettingsModel> for UserLogSettings {
    fn from(model: LogSettingsModel) -> Self {
        UserLogSettings {
            guild_id: Snowflake::from_db(model.guild_id),
            module_enabled: model.module_enabled,
            log_channel_id: model.log_channel_id.map(Snowflake::from_db),
        }
    }
}

impl From<CommandSettingsModel> for CommandSettings {
    fn from(model: CommandSettingsModel) -> Self {
        CommandSettings {
            guild_id: Snowflake::from_db(model.guild_id),
            module_enabled: model.module_enabled,
            prefix: model.prefix,
        }
    }
}
