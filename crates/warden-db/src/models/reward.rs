//! Reward database model

use sqlx::FromRow;

/// Database model for rewards table
#[derive(Debug, Clone, FromRow)]
pub struct RewardModel {
    pub role_id: i64,
    pub guild_id: i64,
    pub reward_level: i32,
    pub reward_message: Option<String>,
}
