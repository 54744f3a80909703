//! Player actions
//!
//! `perform` is the single entry point: one call per player intent. Every
//! action returns whether it succeeded; refusals write a history entry and
//! leave the state untouched.

pub mod building;
pub mod crafting;
pub mod gathering;
pub mod travel;

use rand::Rng;
use std::str::FromStr;

use crate::combat::resolution::{combat_turn, enemy_on_tile, start_combat};
use crate::combat::state::CombatAction;
use crate::core::config::GameConfig;
use crate::core::error::GameError;
use crate::core::types::Direction;
use crate::simulation::history::HistoryEntry;
use crate::simulation::state::GameState;
use crate::simulation::tick::after_action;

pub use building::{build_house, BuildConfig};
pub use crafting::{craft, CraftCatalog, Item, ItemSpec, Perk};
pub use gathering::{chop_wood, fish, hunt, quarry_stone, GatheringConfig};
pub use travel::{move_player, portal_home, talk, use_consumable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move(Direction),
    ChopWood,
    Quarry,
    Hunt,
    Fish,
    BuildHouse,
    Craft(Item),
    UseConsumable(Item),
    Talk,
    PortalHome,
    Combat(CombatAction),
}

impl FromStr for Intent {
    type Err = GameError;

    /// Parses commands such as `n`, `chop`, `craft axe`, `use potion` or `attack`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, rest) = match s.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (s, ""),
        };
        match verb.to_lowercase().as_str() {
            "chop" | "wood" => Ok(Intent::ChopWood),
            "quarry" | "mine" | "stone" => Ok(Intent::Quarry),
            "hunt" => Ok(Intent::Hunt),
            "fish" => Ok(Intent::Fish),
            "build" => Ok(Intent::BuildHouse),
            "talk" => Ok(Intent::Talk),
            "portal" | "home" => Ok(Intent::PortalHome),
            "craft" => Ok(Intent::Craft(rest.parse()?)),
            "use" | "eat" => Ok(Intent::UseConsumable(rest.parse()?)),
            "go" | "move" => Ok(Intent::Move(rest.parse()?)),
            _ => s
                .parse::<Direction>()
                .map(Intent::Move)
                .or_else(|_| s.parse::<CombatAction>().map(Intent::Combat))
                .map_err(|_| GameError::UnknownAction(s.to_string())),
        }
    }
}

/// Carry out one player intent.
///
/// Outside of movement and combat turns, an enemy sharing the player's tile
/// pulls them into a fight instead. A successful action is followed by the
/// after-action movement pass; the caller still advances the clock.
pub fn perform<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R, intent: Intent) -> bool {
    let ok = match intent {
        Intent::Move(dir) => move_player(state, config, rng, dir),
        Intent::Combat(action) => return combat_turn(state, config, rng, action),
        _ if state.in_combat() => {
            state.log(HistoryEntry::new(&state.player.name, "Finish the fight first").gained("⚔️"));
            return false;
        }
        _ if enemy_on_tile(state, config).is_some() => {
            start_combat(state, config, rng);
            return false;
        }
        Intent::ChopWood => chop_wood(state, config, rng),
        Intent::Quarry => quarry_stone(state, config),
        Intent::Hunt => hunt(state, config, rng),
        Intent::Fish => fish(state, config, rng),
        Intent::BuildHouse => build_house(state, config),
        Intent::Craft(item) => craft(state, config, item),
        Intent::UseConsumable(item) => use_consumable(state, config, item),
        Intent::Talk => talk(state, config, rng),
        Intent::PortalHome => portal_home(state, config),
    };
    if ok {
        after_action(state, config, rng);
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pos;
    use crate::player::resources::Resource;
    use crate::world::grid::WorldGrid;
    use crate::world::tile::Tile;
    use rand::rngs::mock::StepRng;

    fn quiet() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let state = GameState::from_world(WorldGrid::filled(20, 20, 1, Tile::Tree), &config, Pos::new(10, 10));
        (state, config)
    }

    #[test]
    fn test_parse_intents() {
        assert_eq!("n".parse::<Intent>().unwrap(), Intent::Move(Direction::North));
        assert_eq!("go west".parse::<Intent>().unwrap(), Intent::Move(Direction::West));
        assert_eq!("chop".parse::<Intent>().unwrap(), Intent::ChopWood);
        assert_eq!("craft axe".parse::<Intent>().unwrap(), Intent::Craft(Item::Axe));
        assert_eq!("use 🧪".parse::<Intent>().unwrap(), Intent::UseConsumable(Item::Potion));
        assert_eq!("attack".parse::<Intent>().unwrap(), Intent::Combat(CombatAction::Attack));
        assert!(matches!("dance".parse::<Intent>(), Err(GameError::UnknownAction(_))));
        assert!(matches!("craft spaceship".parse::<Intent>(), Err(GameError::UnknownItem(_))));
    }

    #[test]
    fn test_zombie_on_tile_blocks_gathering() {
        let (mut state, config) = quiet();
        state.set_tile(Pos::new(10, 10), Tile::Zombie);
        assert!(!perform(&mut state, &config, &mut StepRng::new(0, 0), Intent::ChopWood));
        assert!(state.in_combat());
        assert_eq!(state.player.resources.get(Resource::Wood), 0);
        assert!(!perform(&mut state, &config, &mut StepRng::new(0, 0), Intent::Fish));
    }

    #[test]
    fn test_combat_intent_without_fight_fails() {
        let (mut state, config) = quiet();
        assert!(!perform(
            &mut state,
            &config,
            &mut StepRng::new(0, 0),
            Intent::Combat(CombatAction::Attack)
        ));
    }

    #[test]
    fn test_chop_through_perform() {
        let (mut state, config) = quiet();
        assert!(perform(&mut state, &config, &mut StepRng::new(0, 0), Intent::ChopWood));
        assert_eq!(state.player.resources.get(Resource::Wood), 1);
    }
}
