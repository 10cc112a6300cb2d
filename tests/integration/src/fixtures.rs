//! Test fixtures and data generators
//!
//! Provides unique ids and ready-made moderation rows.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use warden_core::entities::{Lock, Mute, Tracker};
use warden_core::{Permissions, Snowflake};

/// Counter for unique test ids
static COUNTER: AtomicU64 = AtomicU64::new(1_000);

/// Get a unique snowflake
pub fn unique_id() -> Snowflake {
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// A point `minutes` from now; negative values lie in the past
pub fn minutes_from_now(minutes: i64) -> DateTime<Utc> {
    Utc::now() + Duration::minutes(minutes)
}

pub fn mute(guild_id: Snowflake, user_id: Snowflake, sin_id: i64, end_time: DateTime<Utc>) -> Mute {
    Mute::new(user_id, guild_id, sin_id, end_time)
}

pub fn lock(guild_id: Snowflake, channel_id: Snowflake, end_time: DateTime<Utc>) -> Lock {
    Lock {
        channel_id,
        guild_id,
        moderator_id: unique_id(),
        end_time,
        previously_allowed: Permissions::SEND_MESSAGES,
        previously_denied: Permissions::empty(),
        reason: Some("raid".to_string()),
    }
}

pub fn tracker(
    guild_id: Snowflake,
    user_id: Snowflake,
    log_channel_id: Snowflake,
    end_time: DateTime<Utc>,
) -> Tracker {
    Tracker {
        user_id,
        guild_id,
        log_channel_id,
        moderator_id: unique_id(),
        end_time,
    }
}
