//! Message log channel override database model

use sqlx::FromRow;

/// Database model for message_log_channel_overrides table
#[derive(Debug, Clone, FromRow)]
pub struct LogOverrideModel {
    pub channel_id: i64,
    pub guild_id: i64,
    pub option: String,
}
