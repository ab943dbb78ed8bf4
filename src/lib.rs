//! Timeline windowing and playback engine for recorded match replays.
//!
//! The engine consumes two pre-sorted, immutable data feeds per player — a
//! build-composition event log and a resource stat log — indexed by the
//! simulation loop, and exposes a pure function from (clock state, view
//! window) to renderable buckets. Rendering, data storage and the similarity
//! search backend are external collaborators.

pub mod config;
pub mod core;
pub mod index;
pub mod input;
pub mod playback;
pub mod session;
pub mod similar;
pub mod window;

pub use crate::core::{Event, PlayerId, ReplayMeta, StatSample};
pub use config::PlayerConfig;
pub use index::{FeedError, TimeSeriesIndex};
pub use playback::{ClockAction, ClockPhase, ClockState};
pub use session::ReplaySession;
pub use similar::{Overlay, SimilarPoint, SimilarQuery, SimilaritySearch, SimilarityTracker};
pub use window::{Bucket, TimelineWindow, WindowSpec};
