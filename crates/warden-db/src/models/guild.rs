//! Guild settings database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for guild_settings table
#[derive(Debug, Clone, FromRow)]
pub struct GuildSettingsModel {
    pub guild_id: i64,
    pub log_channel_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
