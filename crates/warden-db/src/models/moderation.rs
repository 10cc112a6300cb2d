//! Time-bound moderation state database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for mutes table
#[derive(Debug, Clone, FromRow)]
pub struct MuteModel {
    pub user_id: i64,
    pub guild_id: i64,
    pub sin_id: i64,
    pub end_time: DateTime<Utc>,
}

/// Database model for locks table
#[derive(Debug, Clone, FromRow)]
pub struct LockModel {
    pub channel_id: i64,
    pub guild_id: i64,
    pub moderator_id: i64,
    pub end_time: DateTime<Utc>,
    pub previously_allowed: i64,
    pub previously_denied: i64,
    pub reason: Option<String>,
}

/// Database model for trackers table
#[derive(Debug, Clone, FromRow)]
pub struct TrackerModel {
    pub user_id: i64,
    pub guild_id: i64,
    pub log_channel_id: i64,
    pub moderator_id: i64,
    pub end_time: DateTime<Utc>,
}
