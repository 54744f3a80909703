//! House building on the village plot

use serde::{Deserialize, Serialize};

use crate::core::config::GameConfig;
use crate::player::resources::{format_cost, Cost, Resource};
use crate::simulation::history::HistoryEntry;
use crate::simulation::state::GameState;
use crate::world::tile::Tile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub cost: Cost,
    /// Tile the player must stand on to build
    pub plot: Tile,
    /// Tile left behind once the house stands
    pub result: Tile,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            cost: vec![(Resource::Wood, 5), (Resource::Stone, 3), (Resource::Gold, 2)],
            plot: Tile::Sign,
            result: Tile::Home,
        }
    }
}

pub fn build_house(state: &mut GameState, config: &GameConfig) -> bool {
    let build = &config.build;
    let pos = state.player.pos;
    if state.tile(pos) != Some(build.plot) {
        state.log(
            HistoryEntry::new(&state.player.name, format!("Houses go on the {} plot", build.plot)).gained("❌"),
        );
        return false;
    }
    if !state.spend(&build.cost) {
        state.log(
            HistoryEntry::new(
                &state.player.name,
                format!("Not enough to build (needs {})", format_cost(&build.cost)),
            )
            .gained("❌"),
        );
        return false;
    }

    state.set_tile(pos, build.result);
    state.log(
        HistoryEntry::new(&state.player.name, "Built a house")
            .gained(format!("-{}", format_cost(&build.cost)))
            .map(format!("{} -> {}", build.plot, build.result)),
    );
    tracing::info!(%pos, "house built");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pos;
    use crate::world::grid::WorldGrid;

    fn on_plot() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::from_world(WorldGrid::filled(10, 10, 1, Tile::Plain), &config, Pos::new(3, 6));
        state.set_tile(Pos::new(3, 6), Tile::Sign);
        (state, config)
    }

    #[test]
    fn test_build_pays_and_places_home() {
        let (mut state, config) = on_plot();
        state.player.resources.add(Resource::Wood, 6);
        state.player.resources.add(Resource::Stone, 3);
        state.player.resources.add(Resource::Gold, 2);
        assert!(build_house(&mut state, &config));
        assert_eq!(state.player_tile(), Some(Tile::Home));
        assert_eq!(state.player.resources.get(Resource::Wood), 1);
        assert_eq!(state.player.resources.get(Resource::Stone), 0);
        assert_eq!(state.player.resources.get(Resource::Gold), 0);
    }

    #[test]
    fn test_build_is_all_or_nothing() {
        let (mut state, config) = on_plot();
        state.player.resources.add(Resource::Wood, 5);
        state.player.resources.add(Resource::Stone, 3);
        assert!(!build_house(&mut state, &config));
        assert_eq!(state.player_tile(), Some(Tile::Sign));
        assert_eq!(state.player.resources.get(Resource::Wood), 5);
    }

    #[test]
    fn test_build_needs_plot() {
        let (mut state, config) = on_plot();
        state.player.pos = Pos::new(5, 5);
        state.player.resources.add(Resource::Wood, 5);
        state.player.resources.add(Resource::Stone, 3);
        state.player.resources.add(Resource::Gold, 2);
        assert!(!build_house(&mut state, &config));
        assert_eq!(state.player.resources.get(Resource::Gold), 2);
    }
}
