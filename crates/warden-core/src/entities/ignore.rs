//! Ignore rules - members, channels and roles exempt from XP gain

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::value_objects::Snowflake;

/// Which ignore table an id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreCategory {
    Member,
    Channel,
    Role,
}

impl IgnoreCategory {
    pub const ALL: [IgnoreCategory; 3] = [Self::Member, Self::Channel, Self::Role];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Channel => "channel",
            Self::Role => "role",
        }
    }
}

impl fmt::Display for IgnoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of every ignore rule of a guild
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredItems {
    pub members: HashSet<Snowflake>,
    pub channels: HashSet<Snowflake>,
    pub roles: HashSet<Snowflake>,
}

impl IgnoredItems {
    /// Ids of one category
    pub fn get(&self, category: IgnoreCategory) -> &HashSet<Snowflake> {
        match category {
            IgnoreCategory::Member => &self.members,
            IgnoreCategory::Channel => &self.channels,
            IgnoreCategory::Role => &self.roles,
        }
    }

    /// Check whether any rule exempts this message author/channel pair
    pub fn matches(&self, user_id: Snowflake, role_ids: &[Snowflake], channel_id: Snowflake) -> bool {
        self.members.contains(&user_id)
            || self.channels.contains(&channel_id)
            || role_ids.iter().any(|role| self.roles.contains(role))
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.channels.is_empty() && self.roles.is_empty()
    }
}
