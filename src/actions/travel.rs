//! Player movement, the home portal, consumables and villager talk

use rand::seq::SliceRandom;
use rand::Rng;

use crate::actions::crafting::{Item, Perk};
use crate::combat::equipment::has_perk;
use crate::combat::resolution::start_combat;
use crate::core::config::GameConfig;
use crate::core::types::Direction;
use crate::entity::kinds::VillagerRole;
use crate::simulation::history::HistoryEntry;
use crate::simulation::state::GameState;

/// Step one tile. Blocked terrain and the world edge refuse the move; a rope
/// opens rocky tiles and a boat opens water.
pub fn move_player<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R, dir: Direction) -> bool {
    if state.in_combat() {
        state.log(HistoryEntry::new(&state.player.name, "You cannot walk away from a fight").gained("❌"));
        return false;
    }
    let target = state.player.pos.step(dir);
    let Some(tile) = state.tile(target) else {
        state.log(HistoryEntry::new(&state.player.name, format!("The edge of the world {}", target)).gained("🧱"));
        return false;
    };

    let climbs = tile.is_rocky() && has_perk(&state.player, &config.catalog, Perk::Climbing);
    let sails = tile.is_water() && has_perk(&state.player, &config.catalog, Perk::Sailing);
    let passable = (!tile.is_blocked() || climbs) && (!tile.is_water() || sails);
    if !passable {
        state.log(HistoryEntry::new(&state.player.name, format!("{} is impassable {}", tile, target)).gained("🚫"));
        return false;
    }

    let from = state.player.pos;
    state.player.pos = target;
    state.reveal_around(config);
    state.log(
        HistoryEntry::new(&state.player.name, format!("Walked to {}", target))
            .gained(format!("👣 {}", tile))
            .map(format!("{} -> {}", from, target)),
    );
    tracing::debug!(%from, to = %target, "player moved");
    start_combat(state, config, rng);
    true
}

pub fn portal_home(state: &mut GameState, config: &GameConfig) -> bool {
    let home = config.world.home;
    if state.player.pos == home {
        state.log(HistoryEntry::new(&state.player.name, "Already home").gained("❌"));
        return false;
    }
    let from = state.player.pos;
    state.player.pos = home;
    state.reveal_around(config);
    state.log(
        HistoryEntry::new(&state.player.name, format!("Portal home {}", home))
            .gained("🌀")
            .map(format!("{} -> {}", from, home)),
    );
    true
}

/// Consume a carried healing item
pub fn use_consumable(state: &mut GameState, config: &GameConfig, item: Item) -> bool {
    let Some(heal) = config
        .catalog
        .get(item)
        .filter(|s| s.is_consumable())
        .map(|s| s.heal)
    else {
        state.log(HistoryEntry::new(&state.player.name, format!("{} is not consumable", item)).gained("❌"));
        return false;
    };
    if !state.player.take_item(item) {
        state.log(HistoryEntry::new(&state.player.name, format!("No {} to use", item)).gained("❌"));
        return false;
    }
    let healed = state.player.heal(heal);
    state.log(
        HistoryEntry::new(&state.player.name, format!("Used {}", item))
            .gained(format!("+{}❤️", healed))
            .map(format!("HP {}/{}", state.player.hp, state.player.max_hp)),
    );
    true
}

/// Talk to the villager on this tile. The quest master also hands out a
/// random quest that is not already running.
pub fn talk<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) -> bool {
    let Some(kind) = state.population.villager_at(state.player.pos).map(|v| v.kind) else {
        state.log(HistoryEntry::new(&state.player.name, "Nobody to talk to"));
        return false;
    };
    let spec = config.villagers.spec(kind);
    state.log(HistoryEntry::new(&spec.symbol, format!("{}: \"{}\"", spec.name, spec.dialog)));
    if spec.role != VillagerRole::Quest {
        return true;
    }

    let available: Vec<&str> = config
        .quests
        .iter()
        .map(|q| q.id.as_str())
        .filter(|id| !state.quests.is_active(id))
        .collect();
    match available.choose(rng) {
        Some(id) => {
            state.offer_quest(config, id);
        }
        None => state.log(HistoryEntry::new(
            "Quest master",
            "Every quest is taken. Finish one to get another.",
        )),
    }
    true
}
