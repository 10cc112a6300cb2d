//! # warden-service
//!
//! Application layer: the module gate, ignore and log-override resolution,
//! leveling, and the time-bound moderation state (mutes, locks, trackers).

pub mod dto;
pub mod services;

pub use services::{
    IgnoreService, LevelingService, LockService, LogChannelService, LogOverrideService,
    ModuleService, MuteService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, TrackerService, MAX_CHANNEL_DEPTH,
};
