//! Cross-replay synchronization: overlay timelines kept aligned with the
//! primary clock, refreshed only when the visible event set actually grows.

use crate::core::PlayerId;
use crate::index::TimeSeriesIndex;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A position in another replay that resembles the query position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPoint {
    #[serde(rename = "gameid")]
    pub game_id: String,
    #[serde(rename = "playerid")]
    pub player: PlayerId,
    #[serde(rename = "loop")]
    pub loop_id: u32,
}

/// Parameters of one similarity request
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarQuery {
    pub game_id: String,
    pub player: PlayerId,
    pub loop_id: u32,
    /// Allowed loop distance between matching positions
    pub lag: u32,
    /// Maximum number of matches returned
    pub limit: usize,
}

/// Similarity search collaborator.
///
/// Contract: at-least-once delivery per boundary change, best-effort latency.
/// The engine never blocks the clock on a response; stale results are
/// discarded by tag, not aborted.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn find_similar(&self, query: &SimilarQuery) -> anyhow::Result<Vec<SimilarPoint>>;
}

/// A secondary replay timeline displayed with a loop offset tracking the
/// primary clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub source_game: String,
    pub source_player: PlayerId,
    /// Matched position in the source replay
    pub anchor_loop: f64,
    /// Primary loop at the time the match was requested
    pub origin_loop: f64,
}

impl Overlay {
    /// Position of this overlay for a given primary loop.
    ///
    /// The anchor drifts with the primary clock; within `snap_tolerance`
    /// loops of the primary position it locks to it exactly, keeping
    /// near-aligned overlays visually in step.
    pub fn translated(&self, primary_loop: f64, snap_tolerance: f64) -> f64 {
        let drifted = self.anchor_loop + (primary_loop - self.origin_loop);
        if (drifted - primary_loop).abs() <= snap_tolerance {
            primary_loop
        } else {
            drifted
        }
    }
}

/// Identity of an outstanding request; responses carrying a superseded tag
/// are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag {
    pub game_id: String,
    pub player: PlayerId,
    epoch: u64,
}

/// Watches clock advances and decides when a new similarity request is due.
///
/// A request is issued only when the visible-event boundary index changes —
/// the clock ticks 16 times a second, but the boundary moves only when an
/// event scrolls into the past. Exactly one overlay set is authoritative at
/// a time: the latest resolved, non-stale response replaces it wholesale.
#[derive(Debug)]
pub struct SimilarityTracker {
    lag: u32,
    limit: usize,
    epoch: u64,
    last_boundary: Option<(PlayerId, usize)>,
    current_tag: Option<RequestTag>,
    pending_origin: f64,
    overlays: Vec<Overlay>,
}

impl SimilarityTracker {
    pub fn new(lag: u32, limit: usize) -> Self {
        Self {
            lag,
            limit,
            epoch: 0,
            last_boundary: None,
            current_tag: None,
            pending_origin: 0.0,
            overlays: Vec::new(),
        }
    }

    /// Observe a clock advance; returns the request to issue, if one is due.
    pub fn observe(
        &mut self,
        index: &TimeSeriesIndex,
        game_id: &str,
        player: PlayerId,
        loop_pos: f64,
    ) -> Option<(RequestTag, SimilarQuery)> {
        let loop_id = loop_pos.round().max(0.0) as u32;
        let boundary = index.boundary_index(loop_id);

        if self.last_boundary == Some((player, boundary)) {
            return None;
        }
        self.last_boundary = Some((player, boundary));

        self.epoch += 1;
        let tag = RequestTag {
            game_id: game_id.to_string(),
            player,
            epoch: self.epoch,
        };
        self.current_tag = Some(tag.clone());
        self.pending_origin = loop_pos;

        debug!(game = game_id, player = %player, loop_id, boundary, "similarity request due");

        Some((
            tag,
            SimilarQuery {
                game_id: game_id.to_string(),
                player,
                loop_id,
                lag: self.lag,
                limit: self.limit,
            },
        ))
    }

    /// Apply a resolved response. Returns false (and changes nothing) when
    /// the tag has been superseded.
    pub fn resolve(&mut self, tag: &RequestTag, points: Vec<SimilarPoint>) -> bool {
        if self.current_tag.as_ref() != Some(tag) {
            debug!(game = %tag.game_id, "stale similarity response discarded");
            return false;
        }

        let origin_loop = self.pending_origin;
        self.overlays = points
            .into_iter()
            .map(|point| Overlay {
                source_game: point.game_id,
                source_player: point.player,
                anchor_loop: point.loop_id as f64,
                origin_loop,
            })
            .collect();
        true
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Forget outstanding requests and overlays, e.g. when the view changes
    /// to another game. Any in-flight response becomes stale.
    pub fn reset(&mut self) {
        self.last_boundary = None;
        self.current_tag = None;
        self.overlays.clear();
    }
}

/// In-memory search over a fixed set of points, for tests and offline use.
///
/// Serves points whose position lies within `lag` loops of the query, up to
/// the requested limit.
pub struct StaticSearch {
    points: Vec<SimilarPoint>,
}

impl StaticSearch {
    pub fn new(points: Vec<SimilarPoint>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }
}

#[async_trait]
impl SimilaritySearch for StaticSearch {
    async fn find_similar(&self, query: &SimilarQuery) -> anyhow::Result<Vec<SimilarPoint>> {
        let matches = self
            .points
            .iter()
            .filter(|p| {
                p.game_id != query.game_id
                    && (p.loop_id as i64 - query.loop_id as i64).unsigned_abs() <= query.lag as u64
            })
            .take(query.limit)
            .cloned()
            .collect();
        Ok(matches)
    }
}
