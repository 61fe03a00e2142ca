//! Game kinds and difficulty levels as they travel over the wire and sit in the DB.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Memory,
    ColorRush,
    SharpShooter,
    StackGame,
    TapReaction,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Memory,
        GameKind::ColorRush,
        GameKind::SharpShooter,
        GameKind::StackGame,
        GameKind::TapReaction,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            GameKind::Memory => "memory",
            GameKind::ColorRush => "color-rush",
            GameKind::SharpShooter => "sharp-shooter",
            GameKind::StackGame => "stack-game",
            GameKind::TapReaction => "tap-reaction",
        }
    }

    /// Suffix used for per-kind environment overrides, e.g. `REWARD_DIVISOR_COLOR_RUSH`.
    pub fn env_suffix(&self) -> String {
        self.as_str().replace('-', "_").to_ascii_uppercase()
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for GameKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Pick the value for this level from an `[easy, medium, hard]` table.
    pub fn pick<T: Copy>(&self, table: [T; 3]) -> T {
        match self {
            Difficulty::Easy => table[0],
            Difficulty::Medium => table[1],
            Difficulty::Hard => table[2],
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}
