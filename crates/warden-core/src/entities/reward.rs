//! Level rewards - roles granted at a level threshold

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::value_objects::Snowflake;

/// A role granted once a member reaches `level`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub role_id: Snowflake,
    pub guild_id: Snowflake,
    pub level: i32,
    /// Optional announcement sent when the role is granted
    pub message: Option<String>,
}

impl Reward {
    pub fn new(role_id: Snowflake, guild_id: Snowflake, level: i32) -> Self {
        Self {
            role_id,
            guild_id,
            level,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// All rewards of a guild, keyed by role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardSet {
    rewards: HashMap<Snowflake, Reward>,
}

impl RewardSet {
    pub fn get(&self, role_id: Snowflake) -> Option<&Reward> {
        self.rewards.get(&role_id)
    }

    /// Rewards a member at `level` is entitled to, lowest level first
    pub fn earned_at(&self, level: i32) -> Vec<&Reward> {
        let mut earned: Vec<&Reward> = self
            .rewards
            .values()
            .filter(|reward| reward.level <= level)
            .collect();
        earned.sort_by_key(|reward| (reward.level, reward.role_id));
        earned
    }

    /// The lowest reward level strictly above `level`
    pub fn next_after(&self, level: i32) -> Option<&Reward> {
        self.rewards
            .values()
            .filter(|reward| reward.level > level)
            .min_by_key(|reward| (reward.level, reward.role_id))
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reward> {
        self.rewards.values()
    }
}

impl FromIterator<Reward> for RewardSet {
    fn from_iter<I: IntoIterator<Item = Reward>>(iter: I) -> Self {
        Self {
            rewards: iter
                .into_iter()
                .map(|reward| (reward.role_id, reward))
                .collect(),
        }
    }
}
