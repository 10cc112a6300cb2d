//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in warden-core.
//! Each repository handles one logical table group.

mod error;
mod guild;
mod ignore;
mod lock;
mod log_override;
mod module_settings;
mod mute;
mod reward;
mod tracker;

pub use guild::PgGuildSettingsRepository;
pub use ignore::PgIgnoreRepository;
pub use lock::PgLockRepository;
pub use log_override::PgLogOverrideRepository;
pub use module_settings::PgModuleSettingsRepository;
pub use mute::PgMuteRepository;
pub use reward::PgRewardRepository;
pub use tracker::PgTrackerRepository;
