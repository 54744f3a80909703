//! Turn-based combat against zombies, hostile NPCs and hostile animals

pub mod constants;
pub mod equipment;
pub mod loot;
pub mod resolution;
pub mod state;

pub use constants::{CombatConfig, ZombieConfig};
pub use resolution::{combat_turn, enemy_on_tile, start_combat};
pub use state::{Combat, CombatAction, CombatLog, Foe};
