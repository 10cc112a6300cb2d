//! Request DTOs for settings commands
//!
//! Partial updates use `Option` fields: `None` keeps the stored value.

use serde::Deserialize;
use validator::Validate;
use warden_core::Snowflake;

/// Update leveling curve and XP grant parameters
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLevelingSettingsRequest {
    #[validate(range(min = 1, message = "Base must be at least 1"))]
    pub base: Option<i64>,

    /// Percent of `base` added per level
    #[validate(range(min = 0, max = 1000, message = "Modifier must be 0-1000"))]
    pub modifier: Option<i64>,

    #[validate(range(min = 0, message = "Amount must not be negative"))]
    pub amount: Option<i64>,

    /// Cooldown in seconds
    #[validate(range(min = 0, message = "Text time must not be negative"))]
    pub text_time: Option<i64>,
}

impl UpdateLevelingSettingsRequest {
    pub fn is_empty(&self) -> bool {
        self.base.is_none()
            && self.modifier.is_none()
            && self.amount.is_none()
            && self.text_time.is_none()
    }
}

/// Grant a role at a level
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetRewardRequest {
    pub role_id: Snowflake,

    #[validate(range(min = 1, message = "Reward level must be at least 1"))]
    pub level: i32,

    #[validate(length(min = 1, max = 2000, message = "Reward message must be 1-2000 characters"))]
    pub message: Option<String>,
}
