//! Loop/wall-clock conversion and game-time formatting.
//!
//! The simulation advances 16 loops per real-time second; all durations shown
//! to the user are derived from that fixed rate.

/// Simulation loops per real-time second
pub const LOOPS_PER_SEC: f64 = 16.0;

/// Simulation loops per real-time minute
pub const LOOPS_PER_MIN: f64 = LOOPS_PER_SEC * 60.0;

/// Convert a loop position to elapsed game seconds
pub fn loops_to_secs(loops: f64) -> f64 {
    loops / LOOPS_PER_SEC
}

/// Format a loop position as elapsed game time, e.g. `12:05`
pub fn format_elapsed(loops: f64) -> String {
    let total_secs = loops_to_secs(loops.max(0.0)).round() as u64;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Format a loop offset as a signed duration from "now", e.g. `+0:30` / `-2:00`
pub fn format_offset(loops: f64) -> String {
    let sign = if loops < 0.0 { '-' } else { '+' };
    let total_secs = loops_to_secs(loops.abs()).round() as u64;
    format!("{}{}:{:02}", sign, total_secs / 60, total_secs % 60)
}
