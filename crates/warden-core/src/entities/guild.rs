//! Guild settings - root scope of every per-guild row

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild-wide settings row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    pub guild_id: Snowflake,
    /// Fallback destination for general log output
    pub log_channel_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
}

impl GuildSettings {
    /// Create a new, unconfigured guild row
    pub fn new(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            log_channel_id: None,
            created_at: Utc::now(),
        }
    }

    /// Check if a general log channel is configured
    #[inline]
    pub fn has_log_channel(&self) -> bool {
        self.log_channel_id.is_some()
    }
}
