//! Reward and moderation state model -> entity mappers

use warden_core::entities::{Lock, Mute, Reward, Tracker};
use warden_core::value_objects::{Permissions, Snowflake};

use crate::models::{LockModel, MuteModel, RewardModel, TrackerModel};

impl From<RewardModel> for Reward {
    fn from(model: RewardModel) -> Self {
        Reward {
            role_id: Snowflake::from_db(model.role_id),
            guild_id: Snowflake::from_db(model.guild_id),
            level: model.reward_level,
            message: model.reward_message,
        }
    }
}

impl From<MuteModel> for Mute {
    fn from(model: MuteModel) -> Self {
        Mute {
            user_id: Snowflake::from_db(model.user_id),
            guild_id: Snowflake::from_db(model.guild_id),
            sin_id: model.sin_id,
            end_time: model.end_time,
        }
    }
}

impl From<LockModel> for Lock {
    fn from(model: LockModel) -> Self {
        Lock {
            channel_id: Snowflake::from_db(model.channel_id),
            guild_id: Snowflake::from_db(model.guild_id),
            moderator_id: Snowflake::from_db(model.moderator_id),
            end_time: model.end_time,
            previously_allowed: Permissions::from_i64(model.previously_allowed),
            previously_denied: Permissions::from_i64(model.previously_denied),
            reason: model.reason,
        }
    }
}

impl From<TrackerModel> for Tracker {
    fn from(model: TrackerModel) -> Self {
        Tracker {
            user_id: Snowflake::from_db(model.user_id),
            guild_id: Snowflake::from_db(model.guild_id),
            log_channel_id: Snowflake::from_db(model.log_channel_id),
            moderator_id: Snowflake::from_db(model.moderator_id),
            end_time: model.end_time,
        }
    }
}
