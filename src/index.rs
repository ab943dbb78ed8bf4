use crate::core::{Event, StatSample};
use thiserror::Error;

/// A feed that violates the ordering invariant the range queries depend on.
#[derive(Debug, Error, PartialEq)]
pub enum FeedError {
    #[error("event log out of order at index {index}: loop {found} after loop {previous}")]
    UnsortedEvents { index: usize, found: u32, previous: u32 },

    #[error("stat log out of order at index {index}: loop {found} after loop {previous}")]
    UnsortedStats { index: usize, found: u32, previous: u32 },
}

/// Immutable event and stat logs for one player, sorted ascending by loop.
///
/// All queries are binary searches over the sorted arrays and are monotonic
/// in their loop argument: a larger loop never yields an earlier index, so
/// callers scanning the clock forward may reuse previous results as cursors.
#[derive(Debug)]
pub struct TimeSeriesIndex {
    events: Vec<Event>,
    stats: Vec<StatSample>,
}

impl TimeSeriesIndex {
    /// Build an index, refusing input that violates the sort invariant.
    pub fn new(events: Vec<Event>, stats: Vec<StatSample>) -> Result<Self, FeedError> {
        for (index, pair) in events.windows(2).enumerate() {
            if pair[1].loop_id < pair[0].loop_id {
                return Err(FeedError::UnsortedEvents {
                    index: index + 1,
                    found: pair[1].loop_id,
                    previous: pair[0].loop_id,
                });
            }
        }
        for (index, pair) in stats.windows(2).enumerate() {
            if pair[1].loop_id < pair[0].loop_id {
                return Err(FeedError::UnsortedStats {
                    index: index + 1,
                    found: pair[1].loop_id,
                    previous: pair[0].loop_id,
                });
            }
        }

        Ok(Self { events, stats })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn stats(&self) -> &[StatSample] {
        &self.stats
    }

    /// Contiguous slice of events with `min_loop <= loop_id <= max_loop`.
    ///
    /// Live-mode callers truncate `max_loop` to the current loop, which keeps
    /// events at the clock position visible while excluding strictly-future
    /// ones. Returns an empty slice when the bounds cross.
    pub fn event_range(&self, min_loop: u32, max_loop: u32) -> &[Event] {
        let start = self.events.partition_point(|e| e.loop_id < min_loop);
        let end = self.events.partition_point(|e| e.loop_id <= max_loop);
        &self.events[start..end.max(start)]
    }

    /// First index whose event is at or after `loop_id`.
    ///
    /// This is the visible-event boundary the similarity debounce watches:
    /// it only moves when the set of past events actually grows.
    pub fn boundary_index(&self, loop_id: u32) -> usize {
        self.events.partition_point(|e| e.loop_id < loop_id)
    }

    /// The stat sample with the greatest `loop_id <= loop_id`, if any.
    ///
    /// Strictly a last-value query: a sample one loop in the future is never
    /// returned, no matter how much closer it is.
    pub fn latest_stat_at_or_before(&self, loop_id: u32) -> Option<&StatSample> {
        let end = self.stats.partition_point(|s| s.loop_id <= loop_id);
        if end == 0 {
            None
        } else {
            Some(&self.stats[end - 1])
        }
    }

    /// Loop of the last recorded event
    pub fn last_event_loop(&self) -> Option<u32> {
        self.events.last().map(|e| e.loop_id)
    }
}
