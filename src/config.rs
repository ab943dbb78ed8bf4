use crate::core::game_time::LOOPS_PER_MIN;
use crate::window::WindowSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Tunable playback and windowing parameters.
///
/// The defaults are the empirical constants the behavior was tuned with;
/// none of them is load-bearing for correctness, so all are configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Clock ticks per wall-clock second (one tick advances one loop)
    pub tick_hz: f64,
    /// Loops jumped by the transport skip buttons (15 s of game time)
    pub skip_loops: f64,
    /// Fixed number of aggregation buckets per window
    pub bucket_count: usize,
    /// Overlays within this many loops of the primary clock lock onto it
    pub snap_tolerance: f64,
    /// Allowed loop distance passed to the similarity search
    pub similar_lag: u32,
    /// Maximum overlay count requested per search
    pub similar_limit: usize,

    /// Viewports wider than this use the wide profile below
    pub wide_viewport_px: f64,
    /// Half-window size, in minutes of game time
    pub narrow_radius_mins: u32,
    pub wide_radius_mins: u32,
    /// Symlog linear-region constants per profile
    pub narrow_axis_constant: f64,
    pub wide_axis_constant: f64,
    /// Axis tick budget per profile
    pub narrow_max_ticks: usize,
    pub wide_max_ticks: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_hz: 16.0,
            skip_loops: 240.0,
            bucket_count: 50,
            snap_tolerance: 80.0,
            similar_lag: 2400,
            similar_limit: 5,
            wide_viewport_px: 2000.0,
            narrow_radius_mins: 2,
            wide_radius_mins: 6,
            narrow_axis_constant: 1e3,
            wide_axis_constant: 1e5,
            narrow_max_ticks: 10,
            wide_max_ticks: 20,
        }
    }
}

impl PlayerConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("loopscope").join("settings.json"))
    }

    /// Load from the platform config dir, falling back to defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(contents) = fs::read_to_string(&path) {
                    if let Ok(config) = serde_json::from_str(&contents) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("no config directory on this platform"))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Window geometry for a viewport width, using the profile thresholds
    pub fn window_spec(&self, center: f64, live: bool, viewport_width: f64) -> WindowSpec {
        let wide = viewport_width > self.wide_viewport_px;
        let radius_mins = if wide { self.wide_radius_mins } else { self.narrow_radius_mins };
        WindowSpec {
            center,
            radius: radius_mins * LOOPS_PER_MIN as u32,
            bucket_count: self.bucket_count,
            live,
            viewport_width,
            axis_constant: if wide { self.wide_axis_constant } else { self.narrow_axis_constant },
            max_ticks: if wide { self.wide_max_ticks } else { self.narrow_max_ticks },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.bucket_count, 50);
        assert_eq!(config.snap_tolerance, 80.0);
        assert_eq!(config.similar_lag, 2400);
        assert_eq!(config.similar_limit, 5);
        assert_eq!(config.tick_hz, 16.0);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: PlayerConfig = serde_json::from_str(r#"{"bucket_count": 25}"#).unwrap();
        assert_eq!(config.bucket_count, 25);
        assert_eq!(config.snap_tolerance, 80.0);
    }

    #[test]
    fn test_window_spec_profiles() {
        let config = PlayerConfig::default();
        let narrow = config.window_spec(100.0, true, 1280.0);
        assert_eq!(narrow.radius, 2 * LOOPS_PER_MIN as u32);
        assert_eq!(narrow.axis_constant, 1e3);
        assert!(narrow.live);

        let wide = config.window_spec(100.0, false, 2560.0);
        assert_eq!(wide.radius, 6 * LOOPS_PER_MIN as u32);
        assert_eq!(wide.axis_constant, 1e5);
        assert_eq!(wide.max_ticks, 20);
    }

    #[test]
    fn test_round_trip() {
        let config = PlayerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: PlayerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bucket_count, config.bucket_count);
        assert_eq!(back.wide_axis_constant, config.wide_axis_constant);
    }
}
