//! Time-bound moderation state: mutes, channel locks and trackers
//!
//! Each entity has at most one active row per subject. Rows leave the store
//! either through an explicit remove or through the expiry sweep, which hands
//! the removed rows back so the caller can undo their platform side effects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Permissions, Snowflake};

/// Common behaviour of rows that end at a point in time
pub trait Expiring {
    fn end_time(&self) -> DateTime<Utc>;

    /// A row is expired once its end time is reached
    #[inline]
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.end_time() <= now
    }
}

/// An active mute of a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mute {
    pub user_id: Snowflake,
    pub guild_id: Snowflake,
    /// Infraction record that caused the mute
    pub sin_id: i64,
    pub end_time: DateTime<Utc>,
}

impl Mute {
    pub fn new(user_id: Snowflake, guild_id: Snowflake, sin_id: i64, end_time: DateTime<Utc>) -> Self {
        Self {
            user_id,
            guild_id,
            sin_id,
            end_time,
        }
    }
}

impl Expiring for Mute {
    fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }
}

/// A locked channel and the `@everyone` overwrite it replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    pub channel_id: Snowflake,
    pub guild_id: Snowflake,
    pub moderator_id: Snowflake,
    pub end_time: DateTime<Utc>,
    pub previously_allowed: Permissions,
    pub previously_denied: Permissions,
    pub reason: Option<String>,
}

impl Expiring for Lock {
    fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }
}

/// Directive to mirror a member's activity into a channel until `end_time`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub user_id: Snowflake,
    pub guild_id: Snowflake,
    pub log_channel_id: Snowflake,
    pub moderator_id: Snowflake,
    pub end_time: DateTime<Utc>,
}

impl Expiring for Tracker {
    fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }
}
