//! Tilequest - turn-stepped tile-grid adventure simulation
//!
//! A seeded world grid with an infinite procedural extension, a 50-step day
//! clock, resource nodes that deplete and regrow, four classes of roaming
//! actors and a turn-based combat loop with status effects and loot.

pub mod actions;
pub mod combat;
pub mod core;
pub mod entity;
pub mod player;
pub mod simulation;
pub mod world;
