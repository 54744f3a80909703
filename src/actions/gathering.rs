//! Gathering: chopping wood, quarrying stone, hunting and fishing
//!
//! Depleting a node swaps its tile for the depleted stage and arms a
//! regeneration timer (one per coordinate).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::equipment::{stone_bonus, wood_bonus};
use crate::combat::loot::roll_range;
use crate::core::config::GameConfig;
use crate::player::resources::Resource;
use crate::simulation::history::HistoryEntry;
use crate::simulation::state::GameState;
use crate::world::tile::{ResourceClass, Tile};
use crate::world::timers::TimerReason;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatheringConfig {
    pub wood_regen_days: u32,
    pub stone_regen_days: u32,
    pub hunt_regen_days: u32,
    /// Chance each chop also yields a herb
    pub herb_chance: f64,
    pub fish_yield: (u32, u32),
    pub hunt_yield: (u32, u32),
}

impl Default for GatheringConfig {
    fn default() -> Self {
        Self {
            wood_regen_days: 3,
            stone_regen_days: 3,
            hunt_regen_days: 2,
            herb_chance: 0.4,
            fish_yield: (0, 2),
            hunt_yield: (1, 2),
        }
    }
}

fn refuse(state: &mut GameState, msg: &str) -> bool {
    state.log(HistoryEntry::new(&state.player.name, msg).gained("❌"));
    false
}

pub fn chop_wood<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) -> bool {
    let pos = state.player.pos;
    let Some(tile) = state.tile(pos) else {
        return refuse(state, "Nothing to chop here");
    };
    let Some(next) = tile.chopped().filter(|_| tile.resource_class() == Some(ResourceClass::Wood)) else {
        return refuse(state, "Nothing to chop here");
    };
    if tile == Tile::WOOD_DEPLETED && state.timers.has_active(pos) {
        return refuse(state, "The sapling needs time to grow");
    }

    let wood = 1 + wood_bonus(&state.player, &config.catalog);
    let herb = rng.gen_bool(config.gathering.herb_chance);
    state.gain(config, Resource::Wood, wood);
    let mut gained = format!("+{}{}", wood, Resource::Wood.icon());
    if herb {
        state.gain(config, Resource::Herb, 1);
        gained.push_str(&format!(" +1{}", Resource::Herb.icon()));
    }

    state.set_tile(pos, next);
    let days = config.gathering.wood_regen_days;
    let mut entry = HistoryEntry::new(&state.player.name, "Chopped wood")
        .gained(gained)
        .map(format!("{} -> {}", tile, next));
    if state.timers.add(pos, Tile::WOOD_REGROWN, days, TimerReason::Wood) {
        entry = entry.timer(format!("{} in {} days", Tile::WOOD_REGROWN, days));
    }
    state.log(entry);
    tracing::debug!(%pos, wood, herb, "chopped");
    true
}

pub fn quarry_stone(state: &mut GameState, config: &GameConfig) -> bool {
    let pos = state.player.pos;
    let Some(tile) = state.tile(pos) else {
        return refuse(state, "No stone here");
    };
    let Some(next) = tile.quarried().filter(|_| tile.resource_class() == Some(ResourceClass::Stone)) else {
        return refuse(state, "No stone here");
    };
    if tile == Tile::STONE_DEPLETED && state.timers.has_active(pos) {
        return refuse(state, "The pit is worked out for now");
    }

    let stone = 1 + stone_bonus(&state.player, &config.catalog);
    state.gain(config, Resource::Stone, stone);
    state.set_tile(pos, next);
    let days = config.gathering.stone_regen_days;
    let mut entry = HistoryEntry::new(&state.player.name, "Quarried stone")
        .gained(format!("+{}{}", stone, Resource::Stone.icon()))
        .map(format!("{} -> {}", tile, next));
    if state.timers.add(pos, Tile::STONE_REGROWN, days, TimerReason::Stone) {
        entry = entry.timer(format!("{} in {} days", Tile::STONE_REGROWN, days));
    }
    state.log(entry);
    tracing::debug!(%pos, stone, "quarried");
    true
}

/// Hunt a passive animal sharing the tile, or the game tile itself
pub fn hunt<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) -> bool {
    let pos = state.player.pos;
    let prey = state
        .population
        .animal_at(pos)
        .filter(|a| {
            let spec = config.animals.spec(a.kind);
            spec.passive && spec.huntable
        })
        .map(|a| a.id);

    if let Some(id) = prey {
        let Some(animal) = state.population.remove_animal(id) else {
            return refuse(state, "Nothing to hunt here");
        };
        let spec = config.animals.spec(animal.kind);
        let food = roll_range(rng, config.gathering.hunt_yield);
        state.gain(config, Resource::Food, food);
        state.log(
            HistoryEntry::new(&state.player.name, format!("Hunted a {} {}", spec.symbol, spec.name))
                .gained(format!("+{}{}", food, Resource::Food.icon())),
        );
        tracing::debug!(%pos, food, "hunted animal");
        return true;
    }

    let Some(tile) = state.tile(pos).filter(|t| t.resource_class() == Some(ResourceClass::Game)) else {
        return refuse(state, "Nothing to hunt here");
    };
    let food = roll_range(rng, config.gathering.hunt_yield);
    state.gain(config, Resource::Food, food);
    state.set_tile(pos, Tile::Plain);
    let days = config.gathering.hunt_regen_days;
    let mut entry = HistoryEntry::new(&state.player.name, format!("Hunted {}", tile))
        .gained(format!("+{}{}", food, Resource::Food.icon()))
        .map(format!("{} -> {}", tile, Tile::Plain));
    if state.timers.add(pos, tile, days, TimerReason::Hunt) {
        entry = entry.timer(format!("{} in {} days", tile, days));
    }
    state.log(entry);
    tracing::debug!(%pos, food, "hunted game tile");
    true
}

/// Fish from any orthogonally adjacent water tile
pub fn fish<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) -> bool {
    let pos = state.player.pos;
    let near_water = pos
        .neighbors4()
        .any(|p| state.tile(p).map_or(false, |t| t.is_water()));
    if !near_water {
        return refuse(state, "No water nearby to fish in");
    }
    let caught = roll_range(rng, config.gathering.fish_yield);
    state.gain(config, Resource::Fish, caught);
    let description = if caught == 0 { "Nothing bites" } else { "Went fishing" };
    state.log(
        HistoryEntry::new(&state.player.name, description)
            .gained(format!("+{}{}", caught, Resource::Fish.icon())),
    );
    tracing::debug!(%pos, caught, "fished");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::crafting::Item;
    use crate::core::types::Pos;
    use crate::entity::kinds::AnimalKind;
    use crate::entity::population::Animal;
    use crate::world::grid::WorldGrid;
    use rand::rngs::mock::StepRng;

    fn unlucky() -> StepRng {
        StepRng::new(0xF000_0000_0000_0000, 0)
    }

    fn on(tile: Tile) -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let world = WorldGrid::filled(20, 20, 1, tile);
        let state = GameState::from_world(world, &config, Pos::new(10, 10));
        (state, config)
    }

    #[test]
    fn test_chop_tree() {
        let (mut state, config) = on(Tile::Tree);
        assert!(chop_wood(&mut state, &config, &mut unlucky()));
        assert_eq!(state.player.resources.get(Resource::Wood), 1);
        assert_eq!(state.player.resources.get(Resource::Herb), 0);
        assert_eq!(state.player_tile(), Some(Tile::Grass));
        let timer = state.timers.get(Pos::new(10, 10)).unwrap();
        assert_eq!(timer.days_left, 3);
        assert_eq!(timer.restore, Tile::Tree);
    }

    #[test]
    fn test_axe_adds_wood_and_luck_adds_herb() {
        let (mut state, config) = on(Tile::Pine);
        state.player.give_item(Item::Axe);
        assert!(chop_wood(&mut state, &config, &mut StepRng::new(0, 0)));
        assert_eq!(state.player.resources.get(Resource::Wood), 2);
        assert_eq!(state.player.resources.get(Resource::Herb), 1);
    }

    #[test]
    fn test_stump_with_timer_is_refused() {
        let (mut state, config) = on(Tile::Grass);
        assert!(chop_wood(&mut state, &config, &mut unlucky()));
        assert_eq!(state.player_tile(), Some(Tile::Stump));
        assert!(!chop_wood(&mut state, &config, &mut unlucky()));
        assert_eq!(state.player.resources.get(Resource::Wood), 1);
    }

    #[test]
    fn test_chop_requires_wood() {
        let (mut state, config) = on(Tile::Wheat);
        assert!(!chop_wood(&mut state, &config, &mut unlucky()));
        assert!(state.timers.is_empty());
    }

    #[test]
    fn test_quarry_peak_with_pickaxe() {
        let (mut state, config) = on(Tile::Peak);
        state.player.give_item(Item::Pickaxe);
        assert!(quarry_stone(&mut state, &config));
        assert_eq!(state.player.resources.get(Resource::Stone), 2);
        assert_eq!(state.player_tile(), Some(Tile::Rock));
        assert_eq!(state.timers.get(Pos::new(10, 10)).unwrap().restore, Tile::Peak);
    }

    #[test]
    fn test_hunt_game_tile() {
        let (mut state, config) = on(Tile::Deer);
        assert!(hunt(&mut state, &config, &mut unlucky()));
        assert_eq!(state.player.resources.get(Resource::Food), 1);
        assert_eq!(state.player_tile(), Some(Tile::Plain));
        let timer = state.timers.get(Pos::new(10, 10)).unwrap();
        assert_eq!((timer.restore, timer.days_left), (Tile::Deer, 2));
    }

    #[test]
    fn test_hunt_passive_animal() {
        let (mut state, config) = on(Tile::Grass);
        let id = state.population.next_id();
        state.population.animals.push(Animal {
            id,
            kind: AnimalKind::Rabbit,
            pos: Pos::new(10, 10),
            hp: 1,
        });
        assert!(hunt(&mut state, &config, &mut unlucky()));
        assert!(state.population.animals.is_empty());
        assert_eq!(state.player.resources.get(Resource::Food), 1);
    }

    #[test]
    fn test_fish_needs_adjacent_water() {
        let (mut state, config) = on(Tile::Grass);
        assert!(!fish(&mut state, &config, &mut unlucky()));
        state.set_tile(Pos::new(10, 11), Tile::Water);
        assert!(fish(&mut state, &config, &mut StepRng::new(0, 0)));
    }
}
