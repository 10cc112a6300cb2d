//! Business logic services
//!
//! Every service borrows the shared [`ServiceContext`]. Reads go through the
//! settings cache; writes hit the store first and invalidate afterwards.

pub mod context;
pub mod error;
pub mod ignore;
pub mod leveling;
pub mod lock;
pub mod log_channel;
pub mod log_override;
pub mod module;
pub mod mute;
pub mod settings;
pub mod tracker;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use ignore::IgnoreService;
pub use leveling::LevelingService;
pub use lock::LockService;
pub use log_channel::LogChannelService;
pub use log_override::{LogOverrideService, MAX_CHANNEL_DEPTH};
pub use module::ModuleService;
pub use mute::MuteService;
pub use settings::CachedSettings;
pub use tracker::TrackerService;
