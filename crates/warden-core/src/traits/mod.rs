//! Repository traits

mod repositories;

pub use repositories::{
    GuildSettingsRepository, IgnoreRepository, LockRepository, LogOverrideRepository,
    ModuleSettingsRepository, MuteRepository, RepoResult, RewardRepository, TrackerRepository,
};
