//! The simulation: state, clock ticks, world events, history and saves

pub mod events;
pub mod history;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use events::{roll_event, WorldEvent};
pub use history::{HistoryEntry, HistoryLog, HISTORY_CAPACITY};
pub use session::Session;
pub use state::GameState;
pub use tick::{advance, after_action, new_day, tick_status};
