use super::LoadedReplay;
use crate::core::{Event, PlayerId, ReplayMeta, StatSample};
use crate::index::TimeSeriesIndex;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// On-disk timeline document: replay metadata plus the merged event and
/// stat logs for both players, each sorted ascending by loop.
#[derive(Debug, Serialize, Deserialize)]
pub struct TimelineDoc {
    pub replay: ReplayMeta,
    pub events: Vec<Event>,
    #[serde(default)]
    pub stats: Vec<StatSample>,
}

/// Load a JSON timeline document from a file
pub fn load_json(path: &str) -> Result<LoadedReplay> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read timeline: {}", path))?;
    let doc: TimelineDoc = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse timeline: {}", path))?;

    build(doc)
}

/// Split a document into per-player indexes, refusing unsorted feeds
pub fn build(doc: TimelineDoc) -> Result<LoadedReplay> {
    // splitting the merged log preserves the per-player order
    let split = |player: PlayerId| -> Result<TimeSeriesIndex> {
        let events: Vec<Event> = doc
            .events
            .iter()
            .filter(|e| e.player == player)
            .cloned()
            .collect();
        let stats: Vec<StatSample> = doc
            .stats
            .iter()
            .filter(|s| s.player == player)
            .cloned()
            .collect();

        TimeSeriesIndex::new(events, stats)
            .with_context(|| format!("player {} feed for game {}", player, doc.replay.game_id))
    };

    let player_one = split(PlayerId::One)?;
    let player_two = split(PlayerId::Two)?;

    Ok(LoadedReplay {
        meta: doc.replay,
        player_one,
        player_two,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(events: &str) -> TimelineDoc {
        serde_json::from_str(&format!(
            r#"{{
                "replay": {{
                    "gameid": "g-1", "mapname": "Test", "loops": 1000,
                    "p1Name": "Alice", "p1Race": "Terran",
                    "p2Name": "Bob", "p2Race": "Zerg"
                }},
                "events": {},
                "stats": [
                    {{"playerid":1,"loopid":0,"mineralsCurrent":50,"mineralsCollectionRate":0,
                      "vespeneCurrent":0,"vespeneCollectionRate":0,"foodUsed":49152,"foodMade":61440}}
                ]
            }}"#,
            events
        ))
        .unwrap()
    }

    #[test]
    fn test_build_splits_players() {
        let doc = doc(
            r#"[
                {"playerid":1,"loopid":10,"kind":"SCV","num":1},
                {"playerid":2,"loopid":12,"kind":"Drone","num":1},
                {"playerid":1,"loopid":20,"kind":"Marine","num":1}
            ]"#,
        );
        let loaded = build(doc).unwrap();

        assert_eq!(loaded.player_one.events().len(), 2);
        assert_eq!(loaded.player_two.events().len(), 1);
        assert_eq!(loaded.player_one.stats().len(), 1);
        assert!(loaded.player_two.stats().is_empty());
        assert_eq!(loaded.meta.total_loops, 1000);
    }

    #[test]
    fn test_interleaved_player_order_is_fine() {
        // the merged log may interleave players as long as each player's
        // own sequence stays sorted
        let doc = doc(
            r#"[
                {"playerid":2,"loopid":5,"kind":"Drone","num":1},
                {"playerid":1,"loopid":3,"kind":"SCV","num":1},
                {"playerid":2,"loopid":8,"kind":"Drone","num":1}
            ]"#,
        );
        assert!(build(doc).is_ok());
    }

    #[test]
    fn test_unsorted_feed_refused() {
        let doc = doc(
            r#"[
                {"playerid":1,"loopid":20,"kind":"Marine","num":1},
                {"playerid":1,"loopid":10,"kind":"SCV","num":1}
            ]"#,
        );
        let err = build(doc).unwrap_err();
        assert!(err.to_string().contains("player 1"));
    }
}
