pub mod event;
pub mod game_time;
pub mod replay;

pub use event::{Event, PlayerId, StatSample, SUPPLY_FIXED_POINT};
pub use replay::ReplayMeta;
