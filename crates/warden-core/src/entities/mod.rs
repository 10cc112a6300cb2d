//! Domain entities - settings rows and moderation state

mod guild;
mod ignore;
mod log_override;
mod moderation;
mod module;
mod reward;
mod settings;

pub use guild::GuildSettings;
pub use ignore::{IgnoreCategory, IgnoredItems};
pub use log_override::{ChannelLogOverride, LogOverride, OverrideOption};
pub use moderation::{Expiring, Lock, Mute, Tracker};
pub use module::{LogType, ModuleKind};
pub use reward::{Reward, RewardSet};
pub use settings::{
    CommandSettings, LevelingSettings, MessageLogSettings, ModerationSettings, ModuleSettings,
    UserLogSettings,
};
