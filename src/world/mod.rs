//! Tile world: vocabulary, generator, grid store and regeneration timers

pub mod generation;
pub mod grid;
pub mod tile;
pub mod timers;

pub use generation::tile_at;
pub use grid::WorldGrid;
pub use tile::{Biome, ResourceClass, Tile};
pub use timers::{RegenTimer, TimerReason, TimerRegistry};
