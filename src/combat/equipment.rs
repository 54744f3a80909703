//! Derived stats from the carried inventory
//!
//! Only the best single weapon and the best single armor piece count.
//! Carrying any two-handed weapon suppresses shield armor.

use crate::actions::crafting::{CraftCatalog, ItemSpec, Perk};
use crate::player::Player;

fn carried<'a>(player: &'a Player, catalog: &'a CraftCatalog) -> impl Iterator<Item = &'a ItemSpec> {
    player.items.iter().filter_map(|item| catalog.get(*item))
}

pub fn weapon_bonus(player: &Player, catalog: &CraftCatalog) -> i32 {
    carried(player, catalog).map(|s| s.attack).max().unwrap_or(0).max(0)
}

pub fn armor_bonus(player: &Player, catalog: &CraftCatalog) -> i32 {
    let two_handed = carried(player, catalog).any(|s| s.two_handed);
    carried(player, catalog)
        .filter(|s| !(two_handed && s.shield))
        .map(|s| s.armor)
        .max()
        .unwrap_or(0)
        .max(0)
}

pub fn effective_attack(player: &Player, catalog: &CraftCatalog) -> i32 {
    player.attack + weapon_bonus(player, catalog)
}

pub fn effective_armor(player: &Player, catalog: &CraftCatalog) -> i32 {
    player.armor + armor_bonus(player, catalog)
}

pub fn has_perk(player: &Player, catalog: &CraftCatalog, perk: Perk) -> bool {
    carried(player, catalog).any(|s| s.perk == Some(perk))
}

/// Extra wood per chop from the best carried tool
pub fn wood_bonus(player: &Player, catalog: &CraftCatalog) -> u32 {
    carried(player, catalog).map(|s| s.wood_bonus).max().unwrap_or(0)
}

/// Extra stone per quarry from the best carried tool
pub fn stone_bonus(player: &Player, catalog: &CraftCatalog) -> u32 {
    carried(player, catalog).map(|s| s.stone_bonus).max().unwrap_or(0)
}
