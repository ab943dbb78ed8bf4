//! Symmetric-log mapping from loop offsets to display coordinates.

use crate::core::game_time::{self, LOOPS_PER_SEC};

/// Maps a loop offset from the window center onto `[0, width]`.
///
/// The transform is `sign(x) * ln(1 + |x| / constant)`, rescaled so the
/// domain `[-radius, radius]` covers the full width. Offsets near zero get
/// proportionally more room than distant ones; a larger `constant` widens
/// the linear region. The mapping is strictly increasing, so bucket order
/// is preserved on screen.
#[derive(Debug, Clone)]
pub struct SymlogScale {
    constant: f64,
    radius: f64,
    width: f64,
}

impl SymlogScale {
    pub fn new(constant: f64, radius: f64, width: f64) -> Self {
        debug_assert!(constant > 0.0, "symlog constant must be positive");
        debug_assert!(radius > 0.0, "window radius must be positive");
        Self { constant, radius, width }
    }

    fn transform(&self, x: f64) -> f64 {
        let magnitude = (1.0 + x.abs() / self.constant).ln();
        if x < 0.0 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Display coordinate of a loop offset from the window center
    pub fn position(&self, offset: f64) -> f64 {
        let edge = self.transform(self.radius);
        (self.transform(offset) + edge) / (2.0 * edge) * self.width
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// A bounded set of representative offsets with display positions and
    /// duration labels. The zero tick is labeled with absolute elapsed time;
    /// the rest carry signed offsets. Live mode emits only past/now ticks.
    pub fn ticks(&self, max_count: usize, live: bool, now_loop: f64) -> Vec<TickMark> {
        let radius_secs = self.radius / LOOPS_PER_SEC;
        let step_secs = tick_step(radius_secs, max_count.max(3));

        let mut marks = Vec::new();
        let steps = (radius_secs / step_secs).floor() as i64;
        for k in -steps..=steps {
            let offset = k as f64 * step_secs * LOOPS_PER_SEC;
            if live && offset > 0.0 {
                continue;
            }
            // never place a past tick before the start of the game
            if now_loop + offset < 0.0 {
                continue;
            }

            let label = if k == 0 {
                game_time::format_elapsed(now_loop)
            } else {
                game_time::format_offset(offset)
            };

            marks.push(TickMark {
                offset,
                position: self.position(offset),
                label,
            });
        }

        marks
    }
}

/// One axis tick mark
#[derive(Debug, Clone, PartialEq)]
pub struct TickMark {
    /// Loop offset from the window center
    pub offset: f64,
    /// Display coordinate in `[0, width]`
    pub position: f64,
    pub label: String,
}

/// Smallest "nice" step, in seconds, that fits the span in `max_count` ticks
fn tick_step(radius_secs: f64, max_count: usize) -> f64 {
    const NICE_STEPS: [f64; 9] = [5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 180.0, 300.0, 600.0];

    for step in NICE_STEPS {
        let count = 2 * (radius_secs / step).floor() as usize + 1;
        if count <= max_count {
            return step;
        }
    }

    NICE_STEPS[NICE_STEPS.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game_time::LOOPS_PER_MIN;

    fn scale() -> SymlogScale {
        SymlogScale::new(1000.0, 2.0 * LOOPS_PER_MIN, 1200.0)
    }

    #[test]
    fn test_strictly_monotonic() {
        let scale = scale();
        let mut offset = -2.0 * LOOPS_PER_MIN;
        let mut previous = scale.position(offset);
        while offset < 2.0 * LOOPS_PER_MIN {
            offset += 7.0;
            let position = scale.position(offset.min(2.0 * LOOPS_PER_MIN));
            assert!(
                position > previous,
                "axis must be strictly increasing: {} -> {}",
                previous,
                position
            );
            previous = position;
        }
    }

    #[test]
    fn test_center_and_edges() {
        let scale = scale();
        assert!((scale.position(0.0) - 600.0).abs() < 1e-9);
        assert!(scale.position(-2.0 * LOOPS_PER_MIN).abs() < 1e-9);
        assert!((scale.position(2.0 * LOOPS_PER_MIN) - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_near_zero_expanded() {
        // a small constant compresses the edges relative to the center
        let scale = SymlogScale::new(100.0, 1000.0, 1000.0);
        let near = scale.position(100.0) - scale.position(0.0);
        let far = scale.position(1000.0) - scale.position(900.0);
        assert!(near > far);
    }

    #[test]
    fn test_ticks_bounded_and_labeled() {
        let scale = scale();
        let ticks = scale.ticks(10, false, 4.0 * LOOPS_PER_MIN);
        assert!(ticks.len() <= 10);
        let zero = ticks.iter().find(|t| t.offset == 0.0).unwrap();
        assert_eq!(zero.label, "4:00");
        assert!(ticks.iter().any(|t| t.label.starts_with('+')));
        assert!(ticks.iter().any(|t| t.label.starts_with('-')));
    }

    #[test]
    fn test_live_ticks_non_positive_only() {
        let scale = scale();
        let ticks = scale.ticks(10, true, 4.0 * LOOPS_PER_MIN);
        assert!(ticks.iter().all(|t| t.offset <= 0.0));
    }

    #[test]
    fn test_no_ticks_before_game_start() {
        let scale = scale();
        // 30 s into the game, minute-scale past ticks would land before 0:00
        let ticks = scale.ticks(10, false, 30.0 * LOOPS_PER_SEC);
        assert!(ticks.iter().all(|t| 30.0 * LOOPS_PER_SEC + t.offset >= 0.0));
    }
}
