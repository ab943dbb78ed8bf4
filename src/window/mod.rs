//! Fixed-bucket aggregation of a visible event window.
//!
//! Turns a raw event slice around the clock position into a small, fixed
//! number of loop-space buckets with per-kind net counts, plus the nonlinear
//! axis mapping used to place them on screen.

mod scale;

pub use scale::{SymlogScale, TickMark};

use crate::core::Event;
use crate::index::TimeSeriesIndex;
use tracing::trace;

/// Inputs for one window computation.
#[derive(Debug, Clone)]
pub struct WindowSpec {
    /// Window center, the current clock position
    pub center: f64,
    /// Half-window size in loops, always positive
    pub radius: u32,
    /// Number of equal-width loop-space buckets
    pub bucket_count: usize,
    /// Exclude events strictly in the clock's future
    pub live: bool,
    /// Display width the axis maps onto
    pub viewport_width: f64,
    /// Linear-region constant of the symlog axis
    pub axis_constant: f64,
    /// Upper bound on emitted axis ticks
    pub max_ticks: usize,
}

/// Net count for one entity kind within a bucket
#[derive(Debug, Clone, PartialEq)]
pub struct KindCount {
    pub kind: String,
    pub net: i64,
}

/// One aggregated loop-space bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// Loop-space bounds of the bucket
    pub lo: f64,
    pub hi: f64,
    /// Greatest event loop in the bucket; stable identity across re-renders
    pub key: u32,
    /// Later buckets carry higher values so recent icons stay on top
    pub z_index: usize,
    /// Display coordinate of the left edge
    pub left: f64,
    /// Display width, rounded up to a whole unit
    pub width: f64,
    /// Kinds with positive net change, in first-appearance order
    pub top: Vec<KindCount>,
    /// Kinds with negative net change, in first-appearance order
    pub bottom: Vec<KindCount>,
}

/// Result of one window computation: renderable bins plus the axis.
#[derive(Debug, Clone)]
pub struct TimelineWindow {
    pub center: f64,
    pub min_loop: f64,
    pub max_loop: f64,
    pub buckets: Vec<Bucket>,
    pub ticks: Vec<TickMark>,
}

/// Aggregate the visible events around `spec.center` into fixed buckets.
///
/// Pure and synchronous: safe to call from a render path on every tick.
pub fn compute(index: &TimeSeriesIndex, spec: &WindowSpec) -> TimelineWindow {
    debug_assert!(spec.radius > 0, "a zero radius degenerates to a point window");
    debug_assert!(spec.bucket_count > 0);

    let radius = spec.radius as f64;
    let min_loop = spec.center - radius;
    let max_loop = spec.center + radius;

    // Live mode truncates the query to the clock position: events at the
    // current loop stay visible, strictly-future ones never show.
    let upper = if spec.live { spec.center } else { max_loop };
    let query_min = min_loop.round().max(0.0) as u32;
    let query_max = upper.round().max(0.0) as u32;
    let visible = index.event_range(query_min, query_max);

    let axis = SymlogScale::new(spec.axis_constant, radius, spec.viewport_width);
    let buckets = fill_buckets(visible, min_loop, radius, spec, &axis);

    trace!(
        center = spec.center,
        visible = visible.len(),
        buckets = buckets.len(),
        "window computed"
    );

    TimelineWindow {
        center: spec.center,
        min_loop,
        max_loop,
        buckets,
        ticks: axis.ticks(spec.max_ticks, spec.live, spec.center),
    }
}

fn fill_buckets(
    visible: &[Event],
    min_loop: f64,
    radius: f64,
    spec: &WindowSpec,
    axis: &SymlogScale,
) -> Vec<Bucket> {
    struct Accumulator {
        kinds: Vec<(String, i64)>,
        max_loop: u32,
    }

    let bucket_width = 2.0 * radius / spec.bucket_count as f64;
    let mut slots: Vec<Option<Accumulator>> = Vec::new();
    slots.resize_with(spec.bucket_count, || None);

    for event in visible {
        let position = (event.loop_id as f64 - min_loop) / bucket_width;
        let slot = (position.floor() as usize).min(spec.bucket_count - 1);

        let acc = slots[slot].get_or_insert_with(|| Accumulator {
            kinds: Vec::new(),
            max_loop: event.loop_id,
        });
        acc.max_loop = acc.max_loop.max(event.loop_id);
        match acc.kinds.iter_mut().find(|(kind, _)| kind == &event.kind) {
            Some((_, net)) => *net += event.delta as i64,
            None => acc.kinds.push((event.kind.clone(), event.delta as i64)),
        }
    }

    slots
        .into_iter()
        .enumerate()
        .filter_map(|(slot, acc)| {
            let acc = acc?;

            let mut top = Vec::new();
            let mut bottom = Vec::new();
            for (kind, net) in acc.kinds {
                // a kind that nets to zero across the bucket is not rendered
                if net > 0 {
                    top.push(KindCount { kind, net });
                } else if net < 0 {
                    bottom.push(KindCount { kind, net });
                }
            }
            if top.is_empty() && bottom.is_empty() {
                return None;
            }

            let lo = min_loop + slot as f64 * bucket_width;
            let hi = lo + bucket_width;
            let left = axis.position(lo - spec.center);
            let width = (axis.position(hi - spec.center) - left).ceil();

            Some(Bucket {
                lo,
                hi,
                key: acc.max_loop,
                z_index: slot + 1,
                left,
                width,
                top,
                bottom,
            })
        })
        .collect()
}
