pub mod csv;
pub mod json;

pub use csv::load_csv;
pub use json::load_json;

use anyhow::Result;
use crate::core::ReplayMeta;
use crate::index::TimeSeriesIndex;

/// A fully loaded replay: metadata plus one validated index per player.
#[derive(Debug)]
pub struct LoadedReplay {
    pub meta: ReplayMeta,
    pub player_one: TimeSeriesIndex,
    pub player_two: TimeSeriesIndex,
}

/// Input format detection result
#[derive(Debug, Clone)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of a timeline file by sniffing its content
pub fn detect_format(data: &[u8]) -> InputFormat {
    if is_json(data) {
        return InputFormat::Json;
    }

    if is_csv(data) {
        return InputFormat::Csv;
    }

    InputFormat::Unknown
}

fn is_json(data: &[u8]) -> bool {
    // a timeline document is a single JSON object
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .map(|&b| b == b'{')
        .unwrap_or(false)
}

fn is_csv(data: &[u8]) -> bool {
    // text with comma-separated lines near the start
    if data.len() < 10 {
        return false;
    }

    let sample = std::str::from_utf8(&data[..data.len().min(500)]);
    match sample {
        Ok(text) => text
            .lines()
            .take(5)
            .any(|line| line.chars().filter(|&c| c == ',').count() >= 2),
        Err(_) => false,
    }
}

/// Load a replay timeline from a file, auto-detecting the format
pub fn load_file(path: &str) -> Result<LoadedReplay> {
    let data = std::fs::read(path)?;

    match detect_format(&data) {
        InputFormat::Json => load_json(path),
        InputFormat::Csv => load_csv(path),
        InputFormat::Unknown => anyhow::bail!("unknown timeline format: {}", path),
    }
}
