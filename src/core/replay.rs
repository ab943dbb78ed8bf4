use super::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Replay metadata, supplied by the data loader and read-only afterwards.
///
/// `total_loops` is the upper clamp bound for all clock movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayMeta {
    #[serde(rename = "gameid")]
    pub game_id: String,

    #[serde(rename = "filename", default)]
    pub file_name: String,

    #[serde(rename = "mapname")]
    pub map_name: String,

    #[serde(rename = "loops")]
    pub total_loops: u32,

    /// Wall-clock time the match was played, when known
    #[serde(rename = "ts", default, skip_serializing_if = "Option::is_none")]
    pub played_at: Option<DateTime<Utc>>,

    #[serde(rename = "p1Name")]
    pub p1_name: String,
    #[serde(rename = "p1Race")]
    pub p1_race: String,
    #[serde(rename = "p1Result", default)]
    pub p1_result: String,

    #[serde(rename = "p2Name")]
    pub p2_name: String,
    #[serde(rename = "p2Race")]
    pub p2_race: String,
    #[serde(rename = "p2Result", default)]
    pub p2_result: String,
}

impl ReplayMeta {
    pub fn player_name(&self, player: PlayerId) -> &str {
        match player {
            PlayerId::One => &self.p1_name,
            PlayerId::Two => &self.p2_name,
        }
    }

    pub fn player_race(&self, player: PlayerId) -> &str {
        match player {
            PlayerId::One => &self.p1_race,
            PlayerId::Two => &self.p2_race,
        }
    }

    pub fn player_result(&self, player: PlayerId) -> &str {
        match player {
            PlayerId::One => &self.p1_result,
            PlayerId::Two => &self.p2_result,
        }
    }

    /// "P1Race vs P2Race" summary, e.g. "Terran vs Zerg"
    pub fn matchup(&self) -> String {
        format!("{} vs {}", self.p1_race, self.p2_race)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ReplayMeta {
        serde_json::from_str(
            r#"{
                "gameid": "g-1",
                "filename": "ladder/game1.SC2Replay",
                "mapname": "Ever Dream LE",
                "loops": 9600,
                "p1Name": "Alice", "p1Race": "Terran", "p1Result": "Victory",
                "p2Name": "Bob", "p2Race": "Zerg", "p2Result": "Defeat"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_wire_format() {
        let meta = meta();
        assert_eq!(meta.game_id, "g-1");
        assert_eq!(meta.total_loops, 9600);
        assert_eq!(meta.played_at, None);
    }

    #[test]
    fn test_player_lookup() {
        let meta = meta();
        assert_eq!(meta.player_name(PlayerId::One), "Alice");
        assert_eq!(meta.player_race(PlayerId::Two), "Zerg");
        assert_eq!(meta.player_result(PlayerId::One), "Victory");
        assert_eq!(meta.matchup(), "Terran vs Zerg");
    }
}
