//! Playback clock state machine.
//!
//! A reducer over `ClockAction`: pure transition function, no side effects.
//! External synchronization (e.g. driving a companion video player) happens
//! through a `TransportObserver` invoked by the transition caller.

use crate::core::PlayerId;
use tracing::debug;

/// Discrete phase of the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// At loop 0, not running
    Idle,
    Paused,
    Running,
}

/// Inputs to the clock transition function
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockAction {
    /// Begin or resume playback at the current loop
    Start,
    /// Halt at the current loop
    Pause,
    /// Halt and reset to loop 0
    Stop,
    /// One fixed-rate tick; a no-op unless running
    Tick,
    /// Jump by a signed number of loops, clamped to the replay bounds
    Skip(f64),
    SelectPlayer(PlayerId),
}

/// Current clock position and mode.
///
/// `loop_pos` is a real number so partial-tick interpolation and overlay
/// offset arithmetic stay exact; queries against the integer-indexed logs
/// round to the nearest loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockState {
    pub loop_pos: f64,
    pub running: bool,
    pub active_player: PlayerId,
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockState {
    pub fn new() -> Self {
        Self {
            loop_pos: 0.0,
            running: false,
            active_player: PlayerId::One,
        }
    }

    pub fn phase(&self) -> ClockPhase {
        if self.running {
            ClockPhase::Running
        } else if self.loop_pos == 0.0 {
            ClockPhase::Idle
        } else {
            ClockPhase::Paused
        }
    }

    /// Current loop rounded for queries against the integer-indexed logs
    pub fn query_loop(&self) -> u32 {
        self.loop_pos.round().max(0.0) as u32
    }
}

/// Apply one action, producing the next state.
///
/// Total over all (state, action) pairs, and the only place `ClockState`
/// changes. Every reachable state keeps `0 <= loop_pos <= total_loops`.
pub fn reduce(state: &ClockState, action: ClockAction, total_loops: u32) -> ClockState {
    let total = total_loops as f64;

    match action {
        ClockAction::Start => ClockState {
            running: true,
            ..state.clone()
        },
        ClockAction::Pause => ClockState {
            running: false,
            ..state.clone()
        },
        ClockAction::Stop => ClockState {
            loop_pos: 0.0,
            running: false,
            active_player: state.active_player,
        },
        ClockAction::Tick => {
            if !state.running {
                return state.clone();
            }
            let next = (state.loop_pos + 1.0).min(total);
            // reaching the end of the replay pauses in place
            ClockState {
                loop_pos: next,
                running: next < total,
                active_player: state.active_player,
            }
        }
        ClockAction::Skip(amount) => ClockState {
            loop_pos: (state.loop_pos + amount).clamp(0.0, total),
            ..state.clone()
        },
        ClockAction::SelectPlayer(player) => {
            debug!(player = %player, "active player changed");
            ClockState {
                active_player: player,
                ..state.clone()
            }
        }
    }
}

/// Observer notified of clock transitions by the transition caller.
///
/// Keeps side effects such as video-player synchronization outside the pure
/// state machine. Implementations compensating for a media lead-in (the
/// original player seeks the video 2 s behind the game clock) do so here.
pub trait TransportObserver {
    fn on_play(&mut self, _loop_pos: f64) {}
    fn on_pause(&mut self) {}
    fn on_stop(&mut self) {}
    fn on_seek(&mut self, _loop_pos: f64) {}
}

/// Observer that ignores every transition
pub struct NullObserver;

impl TransportObserver for NullObserver {}

/// Apply an action and notify the observer of the resulting transition.
pub fn reduce_observed(
    state: &ClockState,
    action: ClockAction,
    total_loops: u32,
    observer: &mut dyn TransportObserver,
) -> ClockState {
    let next = reduce(state, action, total_loops);

    match action {
        ClockAction::Start => observer.on_play(next.loop_pos),
        ClockAction::Pause => observer.on_pause(),
        ClockAction::Stop => observer.on_stop(),
        ClockAction::Skip(_) => observer.on_seek(next.loop_pos),
        ClockAction::Tick if state.running && !next.running => observer.on_pause(),
        _ => {}
    }

    next
}
