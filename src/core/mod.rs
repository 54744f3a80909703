pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{Calendar, Phase, STEPS_PER_DAY};
pub use config::GameConfig;
pub use types::{Direction, EntityId, Pos, Rect};
