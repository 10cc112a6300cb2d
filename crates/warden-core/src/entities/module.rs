//! Feature modules and log destinations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A feature area that can be switched on or off per guild
///
/// `General` is a pseudo-module: always enabled, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    General,
    Leveling,
    Moderation,
    MessageLog,
    UserLog,
    Commands,
}

impl ModuleKind {
    /// Modules backed by a settings table
    pub const CONFIGURABLE: [ModuleKind; 5] = [
        ModuleKind::Leveling,
        ModuleKind::Moderation,
        ModuleKind::MessageLog,
        ModuleKind::UserLog,
        ModuleKind::Commands,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Leveling => "Leveling",
            Self::Moderation => "Moderation",
            Self::MessageLog => "MessageLog",
            Self::UserLog => "UserLog",
            Self::Commands => "Commands",
        }
    }

    /// Whether the module can never be disabled
    #[inline]
    pub fn is_always_enabled(&self) -> bool {
        matches!(self, Self::General)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "leveling" => Ok(Self::Leveling),
            "moderation" => Ok(Self::Moderation),
            "messagelog" | "message_log" => Ok(Self::MessageLog),
            "userlog" | "user_log" => Ok(Self::UserLog),
            "commands" => Ok(Self::Commands),
            _ => Err(DomainError::UnknownModule(s.to_string())),
        }
    }
}

/// Destination kinds a guild can route log output to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogType {
    General,
    MessageLog,
    UserLog,
    Moderation,
    Leveling,
}

impl LogType {
    /// The module whose enabled flag gates this destination
    pub fn owning_module(&self) -> ModuleKind {
        match self {
            Self::General => ModuleKind::General,
            Self::MessageLog => ModuleKind::MessageLog,
            Self::UserLog => ModuleKind::UserLog,
            Self::Moderation => ModuleKind::Moderation,
            Self::Leveling => ModuleKind::Leveling,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::MessageLog => "MessageLog",
            Self::UserLog => "UserLog",
            Self::Moderation => "Moderation",
            Self::Leveling => "Leveling",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "messagelog" | "message_log" => Ok(Self::MessageLog),
            "userlog" | "user_log" => Ok(Self::UserLog),
            "moderation" => Ok(Self::Moderation),
            "leveling" => Ok(Self::Leveling),
            _ => Err(DomainError::UnknownLogType(s.to_string())),
        }
    }
}
