//! Data transfer objects for settings commands
//!
//! Request DTOs carry validation rules for user input before it reaches a
//! service.

pub mod requests;

pub use requests::{SetRewardRequest, UpdateLevelingSettingsRequest};
