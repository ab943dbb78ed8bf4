//! One loaded replay under playback: metadata, per-player indexes, the
//! clock, and the similarity tracker behind a single surface the rendering
//! collaborator talks to.

use crate::config::PlayerConfig;
use crate::core::{PlayerId, ReplayMeta, StatSample};
use crate::index::TimeSeriesIndex;
use crate::playback::{self, ClockAction, ClockState, NullObserver, TransportObserver};
use crate::similar::{RequestTag, SimilarPoint, SimilarQuery, SimilarityTracker};
use crate::window::{self, TimelineWindow};
use tracing::info;

/// Where to draw an overlay timeline for the current primary loop
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPosition {
    pub game_id: String,
    pub player: PlayerId,
    /// Translated (and possibly snapped) loop in the source replay
    pub loop_pos: f64,
}

pub struct ReplaySession {
    meta: ReplayMeta,
    players: [TimeSeriesIndex; 2],
    clock: ClockState,
    tracker: SimilarityTracker,
    config: PlayerConfig,
}

impl ReplaySession {
    pub fn new(
        meta: ReplayMeta,
        player_one: TimeSeriesIndex,
        player_two: TimeSeriesIndex,
        config: PlayerConfig,
    ) -> Self {
        info!(
            game = %meta.game_id,
            map = %meta.map_name,
            loops = meta.total_loops,
            matchup = %meta.matchup(),
            "session opened"
        );
        let tracker = SimilarityTracker::new(config.similar_lag, config.similar_limit);
        Self {
            meta,
            players: [player_one, player_two],
            clock: ClockState::new(),
            tracker,
            config,
        }
    }

    pub fn meta(&self) -> &ReplayMeta {
        &self.meta
    }

    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn index(&self, player: PlayerId) -> &TimeSeriesIndex {
        &self.players[player.index()]
    }

    /// Apply a clock action. Returns a similarity request when the advance
    /// moved the visible-event boundary for the active player.
    pub fn dispatch(&mut self, action: ClockAction) -> Option<(RequestTag, SimilarQuery)> {
        self.dispatch_observed(action, &mut NullObserver)
    }

    /// As `dispatch`, notifying the observer of the transition.
    pub fn dispatch_observed(
        &mut self,
        action: ClockAction,
        observer: &mut dyn TransportObserver,
    ) -> Option<(RequestTag, SimilarQuery)> {
        self.clock = playback::reduce_observed(&self.clock, action, self.meta.total_loops, observer);

        let player = self.clock.active_player;
        self.tracker.observe(
            &self.players[player.index()],
            &self.meta.game_id,
            player,
            self.clock.loop_pos,
        )
    }

    /// Apply a resolved similarity response; stale tags change nothing.
    pub fn resolve_similar(&mut self, tag: &RequestTag, points: Vec<SimilarPoint>) -> bool {
        self.tracker.resolve(tag, points)
    }

    /// The live timeline window for the active player at the current loop.
    pub fn window(&self, viewport_width: f64) -> TimelineWindow {
        let spec = self
            .config
            .window_spec(self.clock.loop_pos, true, viewport_width);
        window::compute(self.index(self.clock.active_player), &spec)
    }

    /// A non-live window at an arbitrary position, used to render overlay
    /// timelines from their own replays' data.
    pub fn window_at(
        &self,
        player: PlayerId,
        center: f64,
        viewport_width: f64,
    ) -> TimelineWindow {
        let spec = self.config.window_spec(center, false, viewport_width);
        window::compute(self.index(player), &spec)
    }

    /// Translated positions of the current overlays for the primary loop.
    pub fn overlay_positions(&self) -> Vec<OverlayPosition> {
        self.tracker
            .overlays()
            .iter()
            .map(|overlay| OverlayPosition {
                game_id: overlay.source_game.clone(),
                player: overlay.source_player,
                loop_pos: overlay.translated(self.clock.loop_pos, self.config.snap_tolerance),
            })
            .collect()
    }

    /// Latest resource snapshot for the active player at the current loop.
    pub fn current_stats(&self) -> Option<&StatSample> {
        self.index(self.clock.active_player)
            .latest_stat_at_or_before(self.clock.query_loop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Event;

    fn event(player: PlayerId, loop_id: u32, kind: &str, delta: i32) -> Event {
        Event {
            player,
            loop_id,
            kind: kind.to_string(),
            delta,
        }
    }

    fn stat(loop_id: u32, minerals: f64) -> StatSample {
        StatSample {
            player: PlayerId::One,
            loop_id,
            minerals_current: minerals,
            minerals_rate: 0.0,
            vespene_current: 0.0,
            vespene_rate: 0.0,
            food_used: 0.0,
            food_made: 0.0,
        }
    }

    fn session() -> ReplaySession {
        let meta: ReplayMeta = serde_json::from_str(
            r#"{
                "gameid": "g-1", "mapname": "Test Map", "loops": 1000,
                "p1Name": "Alice", "p1Race": "Terran",
                "p2Name": "Bob", "p2Race": "Zerg"
            }"#,
        )
        .unwrap();

        let p1 = TimeSeriesIndex::new(
            vec![
                event(PlayerId::One, 10, "SCV", 1),
                event(PlayerId::One, 100, "Marine", 1),
            ],
            vec![stat(0, 50.0), stat(160, 300.0)],
        )
        .unwrap();
        let p2 = TimeSeriesIndex::new(vec![event(PlayerId::Two, 20, "Drone", 1)], vec![]).unwrap();

        ReplaySession::new(meta, p1, p2, PlayerConfig::default())
    }

    #[test]
    fn test_playback_drives_window() {
        let mut session = session();
        session.dispatch(ClockAction::Start);
        session.dispatch(ClockAction::Skip(100.0));

        let window = session.window(1280.0);
        assert_eq!(window.center, 100.0);
        let kinds: Vec<_> = window
            .buckets
            .iter()
            .flat_map(|b| &b.top)
            .map(|k| k.kind.as_str())
            .collect();
        assert!(kinds.contains(&"SCV"));
        assert!(kinds.contains(&"Marine"));
    }

    #[test]
    fn test_similarity_round_trip_updates_overlays() {
        let mut session = session();
        session.dispatch(ClockAction::Start);
        // skipping past the loop-10 event moves the boundary
        let (tag, query) = session.dispatch(ClockAction::Skip(50.0)).unwrap();
        assert_eq!(query.loop_id, 50);
        assert_eq!(query.lag, 2400);

        let accepted = session.resolve_similar(
            &tag,
            vec![
                SimilarPoint {
                    game_id: "g-2".to_string(),
                    player: PlayerId::Two,
                    loop_id: 60,
                },
                SimilarPoint {
                    game_id: "g-3".to_string(),
                    player: PlayerId::One,
                    loop_id: 400,
                },
            ],
        );
        assert!(accepted);

        // anchor 60 with origin 50 is 10 loops from the primary clock and
        // snaps onto it; anchor 400 is 350 loops out and keeps its drift
        let positions = session.overlay_positions();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].loop_pos, 50.0);
        assert_eq!(positions[1].loop_pos, 400.0);

        // both overlays track the clock as it advances
        session.dispatch(ClockAction::Skip(500.0));
        let positions = session.overlay_positions();
        assert_eq!(positions[0].loop_pos, 550.0);
        assert_eq!(positions[1].loop_pos, 900.0);
    }

    #[test]
    fn test_ticks_between_events_issue_no_requests() {
        let mut session = session();
        session.dispatch(ClockAction::Start);
        let first = session.dispatch(ClockAction::Tick);
        assert!(first.is_some() || session.clock().loop_pos == 1.0);

        // loops 2..=10 cross no event boundary for player one
        for _ in 0..9 {
            assert!(session.dispatch(ClockAction::Tick).is_none());
        }
        // loop 11 passes the loop-10 SCV
        assert!(session.dispatch(ClockAction::Tick).is_some());
    }

    #[test]
    fn test_player_switch_switches_feeds() {
        let mut session = session();
        session.dispatch(ClockAction::Skip(400.0));
        session.dispatch(ClockAction::SelectPlayer(PlayerId::Two));

        let window = session.window(1280.0);
        let kinds: Vec<_> = window
            .buckets
            .iter()
            .flat_map(|b| &b.top)
            .map(|k| k.kind.as_str())
            .collect();
        assert_eq!(kinds, vec!["Drone"]);
        assert!(session.current_stats().is_none());
    }

    #[test]
    fn test_current_stats_follow_clock() {
        let mut session = session();
        assert_eq!(session.current_stats().unwrap().minerals_current, 50.0);
        session.dispatch(ClockAction::Skip(200.0));
        assert_eq!(session.current_stats().unwrap().minerals_current, 300.0);
    }
}
