//! Save files
//!
//! Saving writes the whole `GameState` as JSON. Loading is tolerant: missing
//! lists become empty, missing actor lists are respawned, missing player
//! stats take their starting values, truncated grids are regenerated from the
//! seed and counters are normalized. A save without a world or player (or one
//! that does not parse) falls back to a fresh game.

use ahash::AHashMap;
use rand::Rng;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::combat::state::{Combat, CombatLog, Foe};
use crate::core::calendar::{Calendar, Phase};
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::Pos;
use crate::entity::population::{
    populate_animals, populate_hunters, populate_npcs, populate_villagers, Animal, Hunter, Npc, Villager,
};
use crate::player::quest::QuestLog;
use crate::player::Player;
use crate::simulation::history::{HistoryEntry, HistoryLog};
use crate::simulation::state::GameState;
use crate::world::grid::{overlay_entries, WorldGrid};
use crate::world::tile::Tile;
use crate::world::timers::TimerRegistry;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PopulationSnapshot {
    animals: Option<Vec<Animal>>,
    npcs: Option<Vec<Npc>>,
    villagers: Option<Vec<Villager>>,
    hunters: Option<Vec<Hunter>>,
}

/// Older saves stored a phase name plus steps into that phase
#[derive(Debug, Deserialize)]
struct CalendarSnapshot {
    #[serde(default = "first_day")]
    day: u32,
    #[serde(default, alias = "day_step", alias = "dayStep")]
    step: Option<u32>,
    #[serde(default)]
    phase: Option<Phase>,
    #[serde(default, alias = "phaseSteps")]
    phase_steps: Option<u32>,
}

fn first_day() -> u32 {
    1
}

impl CalendarSnapshot {
    fn into_calendar(self) -> Calendar {
        let step = match (self.step, self.phase) {
            (Some(step), _) => step,
            (None, Some(phase)) => phase.first_step() + self.phase_steps.unwrap_or(0),
            (None, None) => 0,
        };
        Calendar::from_parts(self.day, step)
    }
}

/// Grid record whose parts may be missing; holes are regenerated from the seed
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorldSnapshot {
    width: Option<i32>,
    height: Option<i32>,
    seed: Option<u32>,
    tiles: Vec<Tile>,
    #[serde(with = "overlay_entries")]
    overlay: AHashMap<Pos, Tile>,
}

impl WorldSnapshot {
    fn into_grid(self, fallback_seed: Option<u32>, config: &GameConfig) -> WorldGrid {
        let w = &config.world;
        let seed = self.seed.or(fallback_seed).unwrap_or(w.default_seed);
        let width = self.width.filter(|v| *v > 0).unwrap_or(w.width);
        let height = self.height.filter(|v| *v > 0).unwrap_or(w.height);
        WorldGrid::restore(width, height, seed, self.tiles, self.overlay, w.village)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snapshot {
    seed: Option<u32>,
    world: Option<WorldSnapshot>,
    timers: TimerRegistry,
    population: Option<PopulationSnapshot>,
    player: Option<Player>,
    calendar: Option<CalendarSnapshot>,
    combat: Option<Combat>,
    combat_log: CombatLog,
    history: HistoryLog,
    quests: QuestLog,
    revealed: BTreeSet<Pos>,
}

pub fn to_json(state: &GameState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

pub fn save(state: &GameState, path: &Path) -> Result<()> {
    std::fs::write(path, to_json(state)?)?;
    tracing::info!(path = %path.display(), "game saved");
    Ok(())
}

/// Restore a game from JSON, never failing: unusable input yields a fresh game
pub fn from_json<R: Rng>(json: &str, config: &GameConfig, rng: &mut R) -> GameState {
    let snapshot: Snapshot = match serde_json::from_str(json) {
        Ok(s) => s,
        Err(err) => {
            tracing::warn!(error = %err, "save unreadable, starting a fresh game");
            return GameState::with_seed(config, config.world.default_seed, rng);
        }
    };
    let seed = snapshot.seed.unwrap_or(config.world.default_seed);
    match rebuild(snapshot, config, rng) {
        Some(state) => state,
        None => {
            tracing::warn!(seed, "save has no world or player, starting a fresh game");
            GameState::with_seed(config, seed, rng)
        }
    }
}

/// Load a save file. I/O errors propagate; content problems fall back to a fresh game.
pub fn load<R: Rng>(path: &Path, config: &GameConfig, rng: &mut R) -> Result<GameState> {
    let json = std::fs::read_to_string(path)?;
    let state = from_json(&json, config, rng);
    tracing::info!(path = %path.display(), day = state.calendar.day(), "game loaded");
    Ok(state)
}

fn rebuild<R: Rng>(snap: Snapshot, config: &GameConfig, rng: &mut R) -> Option<GameState> {
    let world = snap.world?.into_grid(snap.seed, config);
    let mut player = snap.player?;
    player.normalize();
    if !player.pos.on_map() {
        player.pos = config.world.hospital;
    }

    let mut state = GameState::from_world(world, config, player.pos);
    state.seed = snap.seed.unwrap_or_else(|| state.world.seed());
    state.player = player;
    state.timers = snap.timers;
    state.calendar = snap
        .calendar
        .map(CalendarSnapshot::into_calendar)
        .unwrap_or_default();
    state.combat_log = snap.combat_log;
    state.history = snap.history;
    state.history.normalize();
    state.quests = snap.quests;
    state.revealed = snap.revealed;

    let pop = snap.population.unwrap_or_default();
    let (width, height) = (state.world.width(), state.world.height());
    let missing_animals = pop.animals.is_none();
    let missing_npcs = pop.npcs.is_none();
    let missing_villagers = pop.villagers.is_none();
    let missing_hunters = pop.hunters.is_none();
    state.population.animals = pop.animals.unwrap_or_default();
    state.population.npcs = pop.npcs.unwrap_or_default();
    state.population.villagers = pop.villagers.unwrap_or_default();
    state.population.hunters = pop.hunters.unwrap_or_default();
    state.population.normalize(width, height);

    if missing_animals {
        populate_animals(&mut state, config, rng);
    }
    if missing_npcs {
        populate_npcs(&mut state, config, rng);
    }
    if missing_villagers {
        populate_villagers(&mut state, config, rng);
    }
    if missing_hunters {
        let (lo, hi) = config.population.hunter_count;
        let wanted = rng.gen_range(lo..=hi) as usize;
        populate_hunters(&mut state, config, rng, wanted);
    }
    if missing_animals || missing_npcs || missing_villagers || missing_hunters {
        tracing::debug!(total = state.population.len(), "respawned missing actors");
    }

    state.combat = snap.combat.filter(|c| foe_still_present(&state, c.foe));
    state.reveal_around(config);
    state.log(HistoryEntry::new("World", "Game restored").gained("💾"));
    Some(state)
}

fn foe_still_present(state: &GameState, foe: Foe) -> bool {
    match foe {
        Foe::Zombie { pos, hp } => hp > 0 && state.world.get(pos) == Some(Tile::Zombie),
        Foe::Npc(id) => state.population.npc(id).is_some(),
        Foe::Animal(id) => state.population.animal(id).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::resources::Resource;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_garbage_falls_back_to_default_seed() {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = from_json("not json at all", &config, &mut rng);
        assert_eq!(state.seed, config.world.default_seed);
        assert_eq!(state.calendar.day(), 1);
    }

    #[test]
    fn test_missing_player_starts_fresh_on_saved_seed() {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let state = from_json(r#"{"seed": 99}"#, &config, &mut rng);
        assert_eq!(state.seed, 99);
    }

    #[test]
    fn test_round_trip_keeps_progress() {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = GameState::with_seed(&config, 4242, &mut rng);
        state.player.resources.add(Resource::Wood, 7);
        state.calendar = Calendar::from_parts(4, 21);
        let json = to_json(&state).unwrap();

        let restored = from_json(&json, &config, &mut rng);
        assert_eq!(restored.seed, 4242);
        assert_eq!(restored.player.resources.get(Resource::Wood), 7);
        assert_eq!(restored.calendar, Calendar::from_parts(4, 21));
        assert_eq!(restored.population.animals, state.population.animals);
    }

    #[test]
    fn test_legacy_phase_fields_convert_to_a_step() {
        let snap: CalendarSnapshot =
            serde_json::from_str(r#"{"day": 2, "phase": "night", "phaseSteps": 4}"#).unwrap();
        assert_eq!(snap.into_calendar(), Calendar::from_parts(2, 34));

        let snap: CalendarSnapshot = serde_json::from_str(r#"{"day": 2, "day_step": 55}"#).unwrap();
        assert_eq!(snap.into_calendar(), Calendar::from_parts(3, 5));
    }
}
