use serde::{Deserialize, Serialize};
use std::fmt;

/// Food values in stat samples are fixed-point: 1 supply = 4096.
pub const SUPPLY_FIXED_POINT: f64 = 4096.0;

/// One of the two players in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Wire representation (1 or 2)
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// Index into per-player arrays (0 or 1)
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn both() -> [PlayerId; 2] {
        [PlayerId::One, PlayerId::Two]
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            other => Err(format!("player id must be 1 or 2, got {}", other)),
        }
    }
}

impl From<PlayerId> for u8 {
    fn from(player: PlayerId) -> u8 {
        player.number()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A single build-composition change: `delta` entities of `kind` came into
/// existence (positive) or were destroyed (negative) at `loop_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "playerid")]
    pub player: PlayerId,

    #[serde(rename = "loopid")]
    pub loop_id: u32,

    /// Unit or structure type name
    pub kind: String,

    /// Net change in entity count, never zero
    #[serde(rename = "num")]
    pub delta: i32,
}

/// Periodic resource snapshot for one player. Sparser than events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSample {
    #[serde(rename = "playerid")]
    pub player: PlayerId,

    #[serde(rename = "loopid")]
    pub loop_id: u32,

    #[serde(rename = "mineralsCurrent")]
    pub minerals_current: f64,

    #[serde(rename = "mineralsCollectionRate")]
    pub minerals_rate: f64,

    #[serde(rename = "vespeneCurrent")]
    pub vespene_current: f64,

    #[serde(rename = "vespeneCollectionRate")]
    pub vespene_rate: f64,

    /// Supply in use, in fixed-point units
    #[serde(rename = "foodUsed")]
    pub food_used: f64,

    /// Supply capacity, in fixed-point units
    #[serde(rename = "foodMade")]
    pub food_made: f64,
}

impl StatSample {
    /// Supply in use, scaled for display
    pub fn supply_used(&self) -> f64 {
        self.food_used / SUPPLY_FIXED_POINT
    }

    /// Supply capacity, scaled for display
    pub fn supply_made(&self) -> f64 {
        self.food_made / SUPPLY_FIXED_POINT
    }
}
