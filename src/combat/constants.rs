//! Combat tunables - every roll and damage range in one place

use serde::{Deserialize, Serialize};

use crate::actions::crafting::Item;

/// Items a slain creature may drop when its special-loot roll succeeds
pub const SPECIAL_LOOT: [Item; 4] = [Item::Syringe, Item::Potion, Item::Sword, Item::Shield];

/// Lines kept in the combat log, newest first
pub const COMBAT_LOG_CAPACITY: usize = 20;

/// General combat rolls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Chance a run attempt ends the fight
    pub run_chance: f64,
    /// Chance the luck ring turns an enemy blow aside
    pub luck_dodge_chance: f64,
    /// Damage multiplier while defending (result is at least 1)
    pub defend_factor: f64,
    pub special_loot: Vec<Item>,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            run_chance: 0.5,
            luck_dodge_chance: 0.2,
            defend_factor: 0.5,
            special_loot: SPECIAL_LOOT.to_vec(),
        }
    }
}

/// Zombies live in the tile layer rather than the population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieConfig {
    pub hp: i32,
    /// Inclusive damage range per hit
    pub damage: (u32, u32),
    /// Extra damage at dusk and at night
    pub dark_bonus: i32,
    /// Chance each zombie swing lands
    pub accuracy: f64,
    /// Days before a grave rises again
    pub respawn_days: u32,
    pub gold: (u32, u32),
    pub item_chance: f64,
    pub loot_items: Vec<Item>,
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            hp: 6,
            damage: (1, 2),
            dark_bonus: 1,
            accuracy: 0.7,
            respawn_days: 5,
            gold: (1, 3),
            item_chance: 0.2,
            loot_items: SPECIAL_LOOT.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zombie_ranges_reasonable() {
        let z = ZombieConfig::default();
        assert!(z.damage.0 <= z.damage.1);
        assert!(z.gold.0 <= z.gold.1);
        assert!(z.accuracy > 0.0 && z.accuracy < 1.0);
    }

    #[test]
    fn test_defend_factor_reduces_damage() {
        let c = CombatConfig::default();
        assert!(c.defend_factor > 0.0 && c.defend_factor < 1.0);
    }
}
