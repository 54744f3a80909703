//! Roaming actors: kinds, population and movement

pub mod kinds;
pub mod movement;
pub mod population;

pub use kinds::{AnimalKind, CreatureSpec, HunterKind, NpcKind, VillagerKind, VillagerRole};
pub use movement::{move_all, MovePass};
pub use population::{Animal, Hunter, Npc, Population, PopulationConfig, Villager};
