use super::LoadedReplay;
use crate::core::{Event, PlayerId, ReplayMeta};
use crate::index::TimeSeriesIndex;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a bare CSV event log.
///
/// Supports flexible column names:
/// - playerid,loopid,kind,num
/// - player,loop,kind,delta
///
/// CSV carries no metadata or stat samples; the replay name is taken from
/// the file name and the length from the last event.
pub fn load_csv(path: &str) -> Result<LoadedReplay> {
    let file_path = Path::new(path);
    let mut rdr = csv::Reader::from_path(file_path)?;

    let headers = rdr.headers()?;
    let (player_idx, loop_idx, kind_idx, delta_idx) = detect_columns(headers)?;

    let mut events = Vec::new();

    for result in rdr.records() {
        let record = result.context("failed to read CSV row")?;

        let player = record
            .get(player_idx)
            .and_then(|s| s.parse::<u8>().ok())
            .and_then(|n| PlayerId::try_from(n).ok())
            .context("failed to parse player id")?;

        let loop_id = record
            .get(loop_idx)
            .and_then(|s| s.parse::<u32>().ok())
            .context("failed to parse loop id")?;

        let kind = record.get(kind_idx).context("missing kind column")?.to_string();

        let delta = record
            .get(delta_idx)
            .and_then(|s| s.parse::<i32>().ok())
            .context("failed to parse event delta")?;

        events.push(Event {
            player,
            loop_id,
            kind,
            delta,
        });
    }

    let total_loops = events.iter().map(|e| e.loop_id).max().unwrap_or(0);
    let game_id = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();

    let meta = ReplayMeta {
        game_id,
        file_name: path.to_string(),
        map_name: String::new(),
        total_loops,
        played_at: None,
        p1_name: "Player 1".to_string(),
        p1_race: String::new(),
        p1_result: String::new(),
        p2_name: "Player 2".to_string(),
        p2_race: String::new(),
        p2_result: String::new(),
    };

    let split = |player: PlayerId| -> Vec<Event> {
        events.iter().filter(|e| e.player == player).cloned().collect()
    };

    let player_one = TimeSeriesIndex::new(split(PlayerId::One), vec![])
        .context("player 1 event log")?;
    let player_two = TimeSeriesIndex::new(split(PlayerId::Two), vec![])
        .context("player 2 event log")?;

    Ok(LoadedReplay {
        meta,
        player_one,
        player_two,
    })
}

/// Detect column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> Result<(usize, usize, usize, usize)> {
    let player_idx = find_column(headers, &["playerid", "player", "player_id"])?;
    let loop_idx = find_column(headers, &["loopid", "loop", "loop_id"])?;
    let kind_idx = find_column(headers, &["kind", "unit", "type"])?;
    let delta_idx = find_column(headers, &["num", "delta", "count"])?;

    Ok((player_idx, loop_idx, kind_idx, delta_idx))
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize> {
    for (idx, header) in headers.iter().enumerate() {
        let header_lower = header.to_lowercase();
        if names.iter().any(|&name| header_lower == name) {
            return Ok(idx);
        }
    }

    anyhow::bail!("could not find column with names: {:?}", names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_load_csv() {
        let path = write_temp(
            "loopscope_test_events.csv",
            "playerid,loopid,kind,num\n1,10,SCV,1\n2,12,Drone,1\n1,40,Marine,-1\n",
        );
        let loaded = load_csv(&path).unwrap();

        assert_eq!(loaded.player_one.events().len(), 2);
        assert_eq!(loaded.player_two.events().len(), 1);
        assert_eq!(loaded.meta.total_loops, 40);
        assert_eq!(loaded.meta.game_id, "loopscope_test_events");
    }

    #[test]
    fn test_alternate_column_names() {
        let path = write_temp(
            "loopscope_test_alt.csv",
            "player,loop,unit,delta\n1,5,Probe,1\n",
        );
        let loaded = load_csv(&path).unwrap();
        assert_eq!(loaded.player_one.events()[0].kind, "Probe");
    }

    #[test]
    fn test_unsorted_csv_refused() {
        let path = write_temp(
            "loopscope_test_unsorted.csv",
            "playerid,loopid,kind,num\n1,40,Marine,1\n1,10,SCV,1\n",
        );
        assert!(load_csv(&path).is_err());
    }

    #[test]
    fn test_bad_player_id_is_an_error() {
        let path = write_temp(
            "loopscope_test_badplayer.csv",
            "playerid,loopid,kind,num\n3,10,SCV,1\n",
        );
        assert!(load_csv(&path).is_err());
    }
}
