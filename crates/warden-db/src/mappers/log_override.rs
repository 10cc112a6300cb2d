//! Log override model -> entity mapper

use warden_core::entities::{ChannelLogOverride, OverrideOption};
use warden_core::error::DomainError;
use warden_core::value_objects::Snowflake;

use crate::models::LogOverrideModel;

/// A row with an unknown option string is an invariant violation
impl TryFrom<LogOverrideModel> for ChannelLogOverride {
    type Error = DomainError;

    fn try_from(model: LogOverrideModel) -> Result<Self, Self::Error> {
        Ok(ChannelLogOverride {
            channel_id: Snowflake::from_db(model.channel_id),
            guild_id: Snowflake::from_db(model.guild_id),
            option: model.option.parse::<OverrideOption>()?,
        })
    }
}
