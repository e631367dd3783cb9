//! Supported game client versions and the menu choice parser.

use std::fmt;
use std::str::FromStr;

/// Supported game client versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameVersion {
    /// Minecraft 1.12.2 client.
    Modern,
    /// Minecraft 1.7.10 client.
    Legacy,
}

/// Menu choice that is neither `1` nor `2`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version choice: {0:?}")]
pub struct ParseVersionError(pub String);

impl GameVersion {
    /// Returns all versions in menu order.
    pub fn all() -> &'static [GameVersion] {
        &[GameVersion::Modern, GameVersion::Legacy]
    }

    /// Version label shown to the user and sent in the report.
    pub fn label(&self) -> &'static str {
        match self {
            GameVersion::Modern => "1.12.2",
            GameVersion::Legacy => "1.7.10",
        }
    }

    /// Directory name of this client under `clients/`.
    pub fn folder(&self) -> &'static str {
        match self {
            GameVersion::Modern => "1122",
            GameVersion::Legacy => "1710",
        }
    }

    /// Menu number of this version.
    pub fn choice(&self) -> u8 {
        match self {
            GameVersion::Modern => 1,
            GameVersion::Legacy => 2,
        }
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a menu choice (`"1"` or `"2"`, surrounding whitespace ignored).
impl FromStr for GameVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(GameVersion::Modern),
            "2" => Ok(GameVersion::Legacy),
            other => Err(ParseVersionError(other.to_string())),
        }
    }
}
