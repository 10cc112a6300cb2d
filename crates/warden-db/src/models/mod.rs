//! Database models - SQLx-compatible structs for PostgreSQL tables

mod guild;
mod log_override;
mod moderation;
mod reward;
mod settings;

pub use guild::GuildSettingsModel;
pub use log_override::LogOverrideModel;
pub use moderation::{LockModel, MuteModel, TrackerModel};
pub use reward::RewardModel;
pub use settings::{
    CommandSettingsModel, LevelingSettingsModel, LogSettingsModel, ModerationSettingsModel,
};
