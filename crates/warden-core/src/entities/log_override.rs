//! Per-channel message log overrides

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Explicit decision persisted for a channel
///
/// Inheritance is the absence of a row, never a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverrideOption {
    AlwaysLog,
    NeverLog,
}

impl OverrideOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlwaysLog => "always_log",
            Self::NeverLog => "never_log",
        }
    }
}

impl fmt::Display for OverrideOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverrideOption {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always_log" => Ok(Self::AlwaysLog),
            "never_log" => Ok(Self::NeverLog),
            _ => Err(DomainError::UnknownLogOverride(s.to_string())),
        }
    }
}

/// Resolved state of a channel: explicit decision or inherit from parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogOverride {
    #[default]
    Inherit,
    AlwaysLog,
    NeverLog,
}

impl LogOverride {
    /// `Some(decision)` for explicit states, `None` for inherit
    pub fn decision(&self) -> Option<bool> {
        match self {
            Self::Inherit => None,
            Self::AlwaysLog => Some(true),
            Self::NeverLog => Some(false),
        }
    }
}

impl From<Option<OverrideOption>> for LogOverride {
    fn from(option: Option<OverrideOption>) -> Self {
        match option {
            None => Self::Inherit,
            Some(OverrideOption::AlwaysLog) => Self::AlwaysLog,
            Some(OverrideOption::NeverLog) => Self::NeverLog,
        }
    }
}

impl From<OverrideOption> for LogOverride {
    fn from(option: OverrideOption) -> Self {
        Self::from(Some(option))
    }
}

/// Override row: at most one per channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelLogOverride {
    pub channel_id: Snowflake,
    pub guild_id: Snowflake,
    pub option: OverrideOption,
}
