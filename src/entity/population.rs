//! Roaming actors and their spawn rules
//!
//! Four actor classes share the grid: wild animals, hostile NPCs, villagers
//! and hunters. Spawning picks random cells and gives up after a bounded
//! number of tries; it never blocks.

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::GameConfig;
use crate::core::types::{EntityId, IdAllocator, Pos};
use crate::entity::kinds::{AnimalKind, HunterKind, NpcKind, VillagerKind};
use crate::simulation::history::HistoryEntry;
use crate::simulation::state::GameState;
use crate::world::tile::Tile;

/// Tiles villagers stand and wander on
pub const VILLAGE_FLOOR: [Tile; 3] = [Tile::Plain, Tile::House, Tile::Hospital];

/// Population caps, spawn retry budgets and movement chances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub animal_cap: usize,
    pub npc_cap: usize,
    /// Animals attempted at dawn of each new day (inclusive range)
    pub daily_animals: (u32, u32),
    /// Distinct hunter kinds placed at world creation (inclusive range)
    pub hunter_count: (u32, u32),
    pub animal_spawn_tries: u32,
    pub npc_spawn_tries: u32,
    pub villager_spawn_tries: u32,
    pub hunter_spawn_tries: u32,
    /// Chance each actor moves after a player action
    pub animal_move_chance: f64,
    pub npc_move_chance: f64,
    pub hunter_move_chance: f64,
    pub villager_move_chance: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            animal_cap: 6,
            npc_cap: 6,
            daily_animals: (1, 2),
            hunter_count: (2, 3),
            animal_spawn_tries: 25,
            npc_spawn_tries: 30,
            villager_spawn_tries: 20,
            hunter_spawn_tries: 30,
            animal_move_chance: 0.5,
            npc_move_chance: 0.25,
            hunter_move_chance: 0.4,
            villager_move_chance: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: EntityId,
    pub kind: AnimalKind,
    pub pos: Pos,
    pub hp: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    pub id: EntityId,
    pub kind: NpcKind,
    pub pos: Pos,
    pub hp: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Villager {
    pub id: EntityId,
    pub kind: VillagerKind,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunter {
    pub id: EntityId,
    pub kind: HunterKind,
    pub pos: Pos,
}

/// Every roaming actor in the world
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Population {
    pub animals: Vec<Animal>,
    pub npcs: Vec<Npc>,
    pub villagers: Vec<Villager>,
    pub hunters: Vec<Hunter>,
    ids: IdAllocator,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    /// Bump the id allocator past every id already in use (after loading)
    pub fn reserve_ids(&mut self) {
        let ids = self
            .animals
            .iter()
            .map(|a| a.id)
            .chain(self.npcs.iter().map(|n| n.id))
            .chain(self.villagers.iter().map(|v| v.id))
            .chain(self.hunters.iter().map(|h| h.id))
            .collect::<Vec<_>>();
        for id in ids {
            self.ids.reserve_past(id);
        }
    }

    pub fn len(&self) -> usize {
        self.animals.len() + self.npcs.len() + self.villagers.len() + self.hunters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells currently held by any actor
    pub fn occupied_cells(&self) -> AHashSet<Pos> {
        self.animals
            .iter()
            .map(|a| a.pos)
            .chain(self.npcs.iter().map(|n| n.pos))
            .chain(self.villagers.iter().map(|v| v.pos))
            .chain(self.hunters.iter().map(|h| h.pos))
            .collect()
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.animals.iter().any(|a| a.pos == pos)
            || self.npcs.iter().any(|n| n.pos == pos)
            || self.villagers.iter().any(|v| v.pos == pos)
            || self.hunters.iter().any(|h| h.pos == pos)
    }

    pub fn animal_at(&self, pos: Pos) -> Option<&Animal> {
        self.animals.iter().find(|a| a.pos == pos)
    }

    pub fn npc_at(&self, pos: Pos) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.pos == pos)
    }

    pub fn villager_at(&self, pos: Pos) -> Option<&Villager> {
        self.villagers.iter().find(|v| v.pos == pos)
    }

    pub fn animal(&self, id: EntityId) -> Option<&Animal> {
        self.animals.iter().find(|a| a.id == id)
    }

    pub fn animal_mut(&mut self, id: EntityId) -> Option<&mut Animal> {
        self.animals.iter_mut().find(|a| a.id == id)
    }

    pub fn npc(&self, id: EntityId) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == id)
    }

    pub fn npc_mut(&mut self, id: EntityId) -> Option<&mut Npc> {
        self.npcs.iter_mut().find(|n| n.id == id)
    }

    pub fn remove_animal(&mut self, id: EntityId) -> Option<Animal> {
        let idx = self.animals.iter().position(|a| a.id == id)?;
        Some(self.animals.remove(idx))
    }

    pub fn remove_npc(&mut self, id: EntityId) -> Option<Npc> {
        let idx = self.npcs.iter().position(|n| n.id == id)?;
        Some(self.npcs.remove(idx))
    }

    /// Drop actors that fell off the grid and separate stacked actors
    pub fn normalize(&mut self, width: i32, height: i32) {
        let inside = |p: Pos| p.x >= 1 && p.y >= 1 && p.x <= width && p.y <= height;
        let mut seen = AHashSet::new();
        self.animals.retain(|a| inside(a.pos) && seen.insert(a.pos));
        self.npcs.retain(|n| inside(n.pos) && seen.insert(n.pos));
        self.villagers.retain(|v| inside(v.pos) && seen.insert(v.pos));
        self.hunters.retain(|h| inside(h.pos) && seen.insert(h.pos));
        self.reserve_ids();
    }
}

fn random_cell<R: Rng>(state: &GameState, rng: &mut R) -> Pos {
    let width = state.world.width().max(1);
    let height = state.world.height().max(1);
    Pos::new(rng.gen_range(1..=width), rng.gen_range(1..=height))
}

/// Try up to `tries` random cells; accept the first free one `accept` likes
fn find_cell<R, F>(state: &GameState, rng: &mut R, tries: u32, accept: F) -> Option<Pos>
where
    R: Rng,
    F: Fn(Pos, Tile) -> bool,
{
    for _ in 0..tries {
        let pos = random_cell(state, rng);
        let Some(tile) = state.world.get(pos) else {
            continue;
        };
        if pos == state.player.pos || state.population.is_occupied(pos) {
            continue;
        }
        if accept(pos, tile) {
            return Some(pos);
        }
    }
    None
}

pub fn spawn_animal<R: Rng>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    kind: AnimalKind,
) -> Option<Pos> {
    let spec = config.animals.spec(kind);
    let village = config.world.village;
    let pos = find_cell(state, rng, config.population.animal_spawn_tries, |pos, tile| {
        !village.contains(pos) && tile != Tile::Zombie && spec.likes(tile)
    })?;
    let id = state.population.next_id();
    state.population.animals.push(Animal {
        id,
        kind,
        pos,
        hp: spec.hp,
    });
    tracing::debug!(kind = ?kind, %pos, "animal spawned");
    Some(pos)
}

pub fn spawn_npc<R: Rng>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    kind: NpcKind,
) -> Option<Pos> {
    let spec = config.npcs.spec(kind);
    let village = config.world.village;
    let pos = find_cell(state, rng, config.population.npc_spawn_tries, |pos, tile| {
        !village.contains(pos) && tile != Tile::Zombie && spec.likes(tile)
    })?;
    let id = state.population.next_id();
    state.population.npcs.push(Npc {
        id,
        kind,
        pos,
        hp: spec.hp,
    });
    tracing::debug!(kind = ?kind, %pos, "npc spawned");
    Some(pos)
}

pub fn spawn_villager<R: Rng>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    kind: VillagerKind,
) -> Option<Pos> {
    let village = config.world.village;
    let pos = find_cell(state, rng, config.population.villager_spawn_tries, |pos, tile| {
        village.contains(pos) && VILLAGE_FLOOR.contains(&tile)
    })?;
    let id = state.population.next_id();
    state.population.villagers.push(Villager { id, kind, pos });
    Some(pos)
}

pub fn spawn_hunter<R: Rng>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    kind: HunterKind,
) -> Option<Pos> {
    let spec = config.hunters.spec(kind);
    let village = config.world.village;
    let pos = find_cell(state, rng, config.population.hunter_spawn_tries, |pos, tile| {
        !village.contains(pos) && spec.tiles.contains(&tile)
    })?;
    let id = state.population.next_id();
    state.population.hunters.push(Hunter { id, kind, pos });
    Some(pos)
}

/// Fill the animal list up to its cap with random kinds
pub fn populate_animals<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    let missing = config
        .population
        .animal_cap
        .saturating_sub(state.population.animals.len());
    for _ in 0..missing {
        if let Some(&kind) = AnimalKind::ALL.choose(rng) {
            spawn_animal(state, config, rng, kind);
        }
    }
}

/// Roll each NPC kind once against its world-creation chance
pub fn populate_npcs<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    for kind in NpcKind::ALL {
        if state.population.npcs.len() >= config.population.npc_cap {
            break;
        }
        if rng.gen_bool(config.npcs.spec(kind).spawn_chance) {
            spawn_npc(state, config, rng, kind);
        }
    }
}

/// One villager of every kind that is not already present
pub fn populate_villagers<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) -> usize {
    let mut placed = 0;
    for kind in VillagerKind::ALL {
        if state.population.villagers.iter().any(|v| v.kind == kind) {
            continue;
        }
        if spawn_villager(state, config, rng, kind).is_some() {
            placed += 1;
        }
    }
    placed
}

/// Place distinct hunter kinds until at least `wanted` are on the map
pub fn populate_hunters<R: Rng>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    wanted: usize,
) -> usize {
    let mut kinds: Vec<HunterKind> = HunterKind::ALL
        .into_iter()
        .filter(|k| !state.population.hunters.iter().any(|h| h.kind == *k))
        .collect();
    kinds.shuffle(rng);
    let mut placed = 0;
    for kind in kinds {
        if state.population.hunters.len() >= wanted {
            break;
        }
        if spawn_hunter(state, config, rng, kind).is_some() {
            placed += 1;
        }
    }
    placed
}

/// Populate a freshly generated world
pub fn spawn_initial<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    populate_animals(state, config, rng);
    populate_npcs(state, config, rng);
    populate_villagers(state, config, rng);
    let (lo, hi) = config.population.hunter_count;
    let wanted = rng.gen_range(lo..=hi) as usize;
    populate_hunters(state, config, rng, wanted);
    tracing::info!(
        animals = state.population.animals.len(),
        npcs = state.population.npcs.len(),
        villagers = state.population.villagers.len(),
        hunters = state.population.hunters.len(),
        "world populated"
    );
}

/// Daily spawn wave for all four actor classes, bounded by the caps
pub fn spawn_daily<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    let pop = &config.population;

    let (lo, hi) = pop.daily_animals;
    let count = rng.gen_range(lo..=hi);
    for _ in 0..count {
        if state.population.animals.len() >= pop.animal_cap {
            break;
        }
        let Some(&kind) = AnimalKind::ALL.choose(rng) else {
            break;
        };
        if let Some(pos) = spawn_animal(state, config, rng, kind) {
            let spec = config.animals.spec(kind);
            state.log(
                HistoryEntry::new(&spec.name, format!("{} {} appeared", spec.symbol, spec.name))
                    .map(pos.to_string()),
            );
        }
    }

    for kind in NpcKind::ALL {
        if state.population.npcs.len() >= pop.npc_cap {
            break;
        }
        let spec = config.npcs.spec(kind);
        if !rng.gen_bool(spec.daily_spawn_chance) {
            continue;
        }
        if let Some(pos) = spawn_npc(state, config, rng, kind) {
            state.log(
                HistoryEntry::new(&spec.name, format!("{} {} prowls nearby", spec.symbol, spec.name))
                    .map(pos.to_string()),
            );
        }
    }

    if populate_villagers(state, config, rng) > 0 {
        state.log(HistoryEntry::new("Village", "A new face settles in the village"));
    }
    if populate_hunters(state, config, rng, pop.hunter_count.0 as usize) > 0 {
        state.log(HistoryEntry::new("Forest", "A hunter returns to the woods"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Rect;
    use crate::world::grid::WorldGrid;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn meadow_state(config: &GameConfig) -> GameState {
        let mut world = WorldGrid::filled(12, 12, 1, Tile::Grass);
        for y in 4..=9 {
            for x in 2..=4 {
                world.set(Pos::new(x, y), Tile::Plain);
            }
        }
        GameState::from_world(world, config, Pos::new(3, 6))
    }

    fn small_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.world.width = 12;
        config.world.height = 12;
        config.world.village = Rect::new(Pos::new(2, 4), Pos::new(4, 9));
        config
    }

    #[test]
    fn test_spawned_actors_never_share_cells() {
        let config = small_config();
        let mut state = meadow_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        spawn_initial(&mut state, &config, &mut rng);
        spawn_daily(&mut state, &config, &mut rng);

        let cells = state.population.occupied_cells();
        assert_eq!(cells.len(), state.population.len());
        assert!(!cells.contains(&state.player.pos));
    }

    #[test]
    fn test_villagers_stay_in_village_and_others_outside() {
        let config = small_config();
        let mut state = meadow_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        spawn_initial(&mut state, &config, &mut rng);

        let village = config.world.village;
        assert!(state.population.villagers.iter().all(|v| village.contains(v.pos)));
        assert!(state.population.animals.iter().all(|a| !village.contains(a.pos)));
        assert!(state.population.npcs.iter().all(|n| !village.contains(n.pos)));
        assert!(state.population.hunters.iter().all(|h| !village.contains(h.pos)));
    }

    #[test]
    fn test_caps_hold_over_many_days() {
        let config = small_config();
        let mut state = meadow_state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        spawn_initial(&mut state, &config, &mut rng);
        for _ in 0..40 {
            spawn_daily(&mut state, &config, &mut rng);
        }
        assert!(state.population.animals.len() <= config.population.animal_cap);
        assert!(state.population.npcs.len() <= config.population.npc_cap);
        assert!(state.population.villagers.len() <= VillagerKind::ALL.len());
    }

    #[test]
    fn test_spawn_gives_up_without_suitable_tiles() {
        let config = small_config();
        let world = WorldGrid::filled(12, 12, 1, Tile::Water);
        let mut state = GameState::from_world(world, &config, Pos::new(1, 1));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(spawn_animal(&mut state, &config, &mut rng, AnimalKind::Wolf).is_none());
        assert!(state.population.is_empty());
    }

    #[test]
    fn test_ids_are_unique_after_reserve() {
        let mut pop = Population::new();
        pop.animals.push(Animal {
            id: EntityId(41),
            kind: AnimalKind::Deer,
            pos: Pos::new(1, 1),
            hp: 2,
        });
        pop.reserve_ids();
        assert_eq!(pop.next_id(), EntityId(42));
    }
}
