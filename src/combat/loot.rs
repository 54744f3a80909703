//! Loot rolls for slain enemies

use rand::seq::SliceRandom;
use rand::Rng;

use crate::actions::crafting::Item;
use crate::combat::constants::ZombieConfig;
use crate::core::config::GameConfig;
use crate::entity::kinds::LootTable;
use crate::player::resources::Resource;
use crate::simulation::state::GameState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loot {
    pub gold: u32,
    pub food: u32,
    pub item: Option<Item>,
}

impl Loot {
    pub fn is_empty(&self) -> bool {
        self.gold == 0 && self.food == 0 && self.item.is_none()
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.gold > 0 {
            parts.push(format!("+{}{}", self.gold, Resource::Gold.icon()));
        }
        if self.food > 0 {
            parts.push(format!("+{}{}", self.food, Resource::Food.icon()));
        }
        if let Some(item) = self.item {
            parts.push(format!("+{}", item));
        }
        if parts.is_empty() {
            "nothing".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Inclusive range roll that tolerates an empty or inverted range
pub fn roll_range<R: Rng>(rng: &mut R, (lo, hi): (u32, u32)) -> u32 {
    if hi <= lo {
        lo
    } else {
        rng.gen_range(lo..=hi)
    }
}

fn roll_item<R: Rng>(rng: &mut R, chance: f64, items: &[Item]) -> Option<Item> {
    if chance > 0.0 && rng.gen_bool(chance.min(1.0)) {
        items.choose(rng).copied()
    } else {
        None
    }
}

pub fn roll_creature_loot<R: Rng>(table: &LootTable, specials: &[Item], rng: &mut R) -> Loot {
    Loot {
        gold: roll_range(rng, table.gold),
        food: roll_range(rng, table.food),
        item: roll_item(rng, table.special_chance, specials),
    }
}

pub fn roll_zombie_loot<R: Rng>(zombie: &ZombieConfig, rng: &mut R) -> Loot {
    Loot {
        gold: roll_range(rng, zombie.gold),
        food: 0,
        item: roll_item(rng, zombie.item_chance, &zombie.loot_items),
    }
}

/// Hand the loot to the player; resource gains count towards quests
pub fn grant(state: &mut GameState, config: &GameConfig, loot: &Loot) {
    state.gain(config, Resource::Gold, loot.gold);
    state.gain(config, Resource::Food, loot.food);
    if let Some(item) = loot.item {
        state.player.give_item(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_unlucky_roll_gives_minimum_and_no_item() {
        let mut rng = StepRng::new(0xF000_0000_0000_0000, 0);
        let loot = roll_zombie_loot(&ZombieConfig::default(), &mut rng);
        assert_eq!(loot.gold, 1);
        assert_eq!(loot.item, None);
    }

    #[test]
    fn test_lucky_roll_drops_an_item() {
        let mut rng = StepRng::new(0, 0);
        let table = LootTable {
            gold: (2, 4),
            food: (0, 0),
            special_chance: 0.2,
        };
        let loot = roll_creature_loot(&table, &[Item::Potion], &mut rng);
        assert_eq!(loot.gold, 2);
        assert_eq!(loot.item, Some(Item::Potion));
    }

    #[test]
    fn test_summary() {
        let loot = Loot {
            gold: 2,
            food: 0,
            item: None,
        };
        assert_eq!(loot.summary(), "+2💰");
        assert_eq!(Loot::default().summary(), "nothing");
    }
}
