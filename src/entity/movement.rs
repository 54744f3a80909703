//! Movement AI for roaming actors
//!
//! Every actor tries the four directions in random order and takes the first
//! cell that passes its filters. The day cycle moves everyone; after a player
//! action each actor only moves with its class's move chance.

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::combat::state::Foe;
use crate::core::config::GameConfig;
use crate::core::types::{Direction, EntityId, Pos, Rect};
use crate::entity::kinds::CreatureSpec;
use crate::entity::population::VILLAGE_FLOOR;
use crate::simulation::history::HistoryEntry;
use crate::simulation::state::GameState;
use crate::world::grid::WorldGrid;
use crate::world::tile::Tile;

/// Which movement pass is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePass {
    /// Reduced-probability pass after each player action
    AfterAction,
    /// Unconditional pass at the start of a new day
    DayCycle,
}

impl MovePass {
    fn rolls<R: Rng>(self, rng: &mut R, chance: f64) -> bool {
        match self {
            MovePass::DayCycle => true,
            MovePass::AfterAction => rng.gen_bool(chance),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Free,
    /// Hostile actor steps onto the player
    Contact,
    /// Hunter steps onto a huntable animal
    Hunt(EntityId),
    Closed,
}

/// Terrain any roaming actor may enter: on the fixed grid, walkable, no zombie
fn roaming_tile(world: &WorldGrid, to: Pos) -> Option<Tile> {
    if !world.in_bounds(to) {
        return None;
    }
    world.get(to).filter(|t| t.is_walkable() && *t != Tile::Zombie)
}

fn shuffled<R: Rng>(rng: &mut R) -> Vec<Direction> {
    let mut dirs = Direction::ALL.to_vec();
    dirs.shuffle(rng);
    dirs
}

fn first_open<F>(from: Pos, dirs: &[Direction], mut probe: F) -> Option<(Pos, Probe)>
where
    F: FnMut(Pos) -> Probe,
{
    dirs.iter().map(|d| from.step(*d)).find_map(|to| match probe(to) {
        Probe::Closed => None,
        p => Some((to, p)),
    })
}

fn creature_probe(
    world: &WorldGrid,
    spec: &CreatureSpec,
    village: Rect,
    player: Pos,
    occupied: &AHashSet<Pos>,
    to: Pos,
) -> Probe {
    let Some(tile) = roaming_tile(world, to) else {
        return Probe::Closed;
    };
    if !spec.likes(tile) {
        return Probe::Closed;
    }
    if to == player {
        return if spec.is_hostile() && !village.contains(to) {
            Probe::Contact
        } else {
            Probe::Closed
        };
    }
    if village.contains(to) || occupied.contains(&to) {
        return Probe::Closed;
    }
    Probe::Free
}

/// Whether a move at either end lies inside the player's reveal radius
fn seen_by_player(state: &GameState, config: &GameConfig, from: Pos, to: Pos) -> bool {
    let radius = config.world.reveal_radius;
    let player = state.player.pos;
    [from, to]
        .iter()
        .any(|p| (p.x - player.x).abs() <= radius && (p.y - player.y).abs() <= radius)
}

fn log_move(
    state: &mut GameState,
    config: &GameConfig,
    pass: MovePass,
    actor: &str,
    symbol: &str,
    from: Pos,
    to: Pos,
) {
    if pass == MovePass::AfterAction && !seen_by_player(state, config, from, to) {
        return;
    }
    state.log(
        HistoryEntry::new(actor, format!("{} {} moved", symbol, actor)).map(format!("{} -> {}", from, to)),
    );
}

fn pinned_foe(state: &GameState) -> Option<Foe> {
    state.combat.as_ref().map(|c| c.foe)
}

pub fn move_animals<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R, pass: MovePass) {
    let pinned = pinned_foe(state);
    let village = config.world.village;
    let mut occupied = state.population.occupied_cells();

    for i in 0..state.population.animals.len() {
        let (id, kind, from) = {
            let a = &state.population.animals[i];
            (a.id, a.kind, a.pos)
        };
        if pinned == Some(Foe::Animal(id)) {
            continue;
        }
        if !pass.rolls(rng, config.population.animal_move_chance) {
            continue;
        }
        let spec = config.animals.spec(kind);
        let player = state.player.pos;
        let mut dirs = shuffled(rng);

        if let Some(radius) = spec.flee_radius {
            let here = from.distance(player);
            if here <= radius {
                let away: Vec<Direction> = dirs
                    .iter()
                    .copied()
                    .filter(|d| {
                        let to = from.step(*d);
                        to.distance(player) > here
                            && creature_probe(&state.world, spec, village, player, &occupied, to)
                                == Probe::Free
                    })
                    .collect();
                if !away.is_empty() {
                    dirs = away;
                }
            }
        }

        let Some((to, probe)) = first_open(from, &dirs, |to| {
            creature_probe(&state.world, spec, village, player, &occupied, to)
        }) else {
            continue;
        };

        occupied.remove(&from);
        occupied.insert(to);
        state.population.animals[i].pos = to;
        if probe == Probe::Contact {
            tracing::debug!(kind = ?kind, "animal charges the player");
            state.pending_attacks.push(Foe::Animal(id));
        }
        log_move(state, config, pass, &spec.name, &spec.symbol, from, to);
    }
}

pub fn move_npcs<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R, pass: MovePass) {
    let pinned = pinned_foe(state);
    let village = config.world.village;
    let mut occupied = state.population.occupied_cells();

    for i in 0..state.population.npcs.len() {
        let (id, kind, from) = {
            let n = &state.population.npcs[i];
            (n.id, n.kind, n.pos)
        };
        let spec = config.npcs.spec(kind);
        if pinned == Some(Foe::Npc(id)) {
            continue;
        }
        if spec.boss && pass == MovePass::AfterAction {
            continue;
        }
        if !pass.rolls(rng, config.population.npc_move_chance) {
            continue;
        }
        let player = state.player.pos;
        let dirs = shuffled(rng);
        let Some((to, probe)) = first_open(from, &dirs, |to| {
            creature_probe(&state.world, spec, village, player, &occupied, to)
        }) else {
            continue;
        };

        occupied.remove(&from);
        occupied.insert(to);
        state.population.npcs[i].pos = to;
        if probe == Probe::Contact {
            tracing::debug!(kind = ?kind, "npc ambushes the player");
            state.pending_attacks.push(Foe::Npc(id));
        }
        log_move(state, config, pass, &spec.name, &spec.symbol, from, to);
    }
}

/// Cells a hunter refuses to enter
fn danger_cells(state: &GameState, config: &GameConfig) -> AHashSet<Pos> {
    let mut danger: AHashSet<Pos> = state.world.find_all(Tile::Zombie).into_iter().collect();
    danger.insert(state.player.pos);
    danger.extend(state.population.npcs.iter().map(|n| n.pos));
    danger.extend(
        state
            .population
            .animals
            .iter()
            .filter(|a| config.animals.spec(a.kind).is_hostile())
            .map(|a| a.pos),
    );
    danger
}

pub fn move_hunters<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R, pass: MovePass) {
    let village = config.world.village;
    let mut occupied = state.population.occupied_cells();

    for i in 0..state.population.hunters.len() {
        let (kind, from) = {
            let h = &state.population.hunters[i];
            (h.kind, h.pos)
        };
        if !pass.rolls(rng, config.population.hunter_move_chance) {
            continue;
        }
        let spec = config.hunters.spec(kind);
        let danger = danger_cells(state, config);
        let dirs = shuffled(rng);
        let Some((to, probe)) = first_open(from, &dirs, |to| {
            let Some(tile) = roaming_tile(&state.world, to) else {
                return Probe::Closed;
            };
            if !spec.tiles.contains(&tile) || village.contains(to) || danger.contains(&to) {
                return Probe::Closed;
            }
            if let Some(animal) = state.population.animal_at(to) {
                return if config.animals.spec(animal.kind).huntable {
                    Probe::Hunt(animal.id)
                } else {
                    Probe::Closed
                };
            }
            if occupied.contains(&to) {
                return Probe::Closed;
            }
            Probe::Free
        }) else {
            continue;
        };

        occupied.remove(&from);
        occupied.insert(to);
        state.population.hunters[i].pos = to;
        if let Probe::Hunt(prey) = probe {
            if let Some(animal) = state.population.remove_animal(prey) {
                let prey_spec = config.animals.spec(animal.kind);
                tracing::debug!(hunter = %spec.name, prey = %prey_spec.name, "hunter kill");
                state.log(
                    HistoryEntry::new(
                        &spec.name,
                        format!("{} {} hunted a {} {}", spec.symbol, spec.name, prey_spec.symbol, prey_spec.name),
                    )
                    .map(to.to_string()),
                );
                continue;
            }
        }
        log_move(state, config, pass, &spec.name, &spec.symbol, from, to);
    }
}

pub fn move_villagers<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R, pass: MovePass) {
    let village = config.world.village;
    let mut occupied = state.population.occupied_cells();

    for i in 0..state.population.villagers.len() {
        let (kind, from) = {
            let v = &state.population.villagers[i];
            (v.kind, v.pos)
        };
        if !pass.rolls(rng, config.population.villager_move_chance) {
            continue;
        }
        let player = state.player.pos;
        let dirs = shuffled(rng);
        let Some((to, _)) = first_open(from, &dirs, |to| {
            let floor = state
                .world
                .get(to)
                .map_or(false, |t| VILLAGE_FLOOR.contains(&t));
            if village.contains(to) && floor && to != player && !occupied.contains(&to) {
                Probe::Free
            } else {
                Probe::Closed
            }
        }) else {
            continue;
        };

        occupied.remove(&from);
        occupied.insert(to);
        state.population.villagers[i].pos = to;
        let spec = config.villagers.spec(kind);
        log_move(state, config, pass, &spec.name, &spec.symbol, from, to);
    }
}

/// Move every actor class once
pub fn move_all<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R, pass: MovePass) {
    move_animals(state, config, rng, pass);
    move_npcs(state, config, rng, pass);
    move_hunters(state, config, rng, pass);
    move_villagers(state, config, rng, pass);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::state::Combat;
    use crate::entity::kinds::{AnimalKind, HunterKind, NpcKind, VillagerKind};
    use crate::entity::population::{Animal, Hunter, Npc, Villager};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state_on(tile: Tile) -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut world = WorldGrid::filled(26, 32, 1, tile);
        for y in 4..=9 {
            for x in 2..=4 {
                world.set(Pos::new(x, y), Tile::Plain);
            }
        }
        let state = GameState::from_world(world, &config, Pos::new(20, 20));
        (state, config)
    }

    fn add_animal(state: &mut GameState, kind: AnimalKind, pos: Pos) -> EntityId {
        let id = state.population.next_id();
        state.population.animals.push(Animal { id, kind, pos, hp: 2 });
        id
    }

    #[test]
    fn test_day_cycle_moves_every_free_animal_one_step() {
        let (mut state, config) = state_on(Tile::Grass);
        add_animal(&mut state, AnimalKind::Deer, Pos::new(12, 12));
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        move_animals(&mut state, &config, &mut rng, MovePass::DayCycle);
        let moved = state.population.animals[0].pos;
        assert_eq!(moved.distance(Pos::new(12, 12)), 1);
    }

    #[test]
    fn test_after_action_pass_respects_move_chance() {
        let (mut state, config) = state_on(Tile::Grass);
        add_animal(&mut state, AnimalKind::Deer, Pos::new(12, 12));
        // Every roll fails
        let mut rng = StepRng::new(0xF000_0000_0000_0000, 0);
        move_animals(&mut state, &config, &mut rng, MovePass::AfterAction);
        assert_eq!(state.population.animals[0].pos, Pos::new(12, 12));
    }

    #[test]
    fn test_actors_never_enter_village_water_or_blocked_cells() {
        let (mut state, config) = state_on(Tile::Grass);
        state.world.set(Pos::new(6, 6), Tile::Water);
        state.world.set(Pos::new(5, 7), Tile::Mountain);
        add_animal(&mut state, AnimalKind::Rabbit, Pos::new(5, 6));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..30 {
            move_all(&mut state, &config, &mut rng, MovePass::DayCycle);
            for a in &state.population.animals {
                let tile = state.world.get(a.pos).unwrap();
                assert!(tile.is_walkable());
                assert!(!config.world.village.contains(a.pos));
            }
        }
    }

    #[test]
    fn test_hostile_contact_queues_an_attack() {
        let (mut state, config) = state_on(Tile::Grass);
        state.player.pos = Pos::new(12, 12);
        // Wolf boxed in with only the player's cell open
        for p in [Pos::new(11, 10), Pos::new(13, 11), Pos::new(11, 11)] {
            state.world.set(p, Tile::Mountain);
        }
        state.world.set(Pos::new(12, 10), Tile::Mountain);
        let wolf = add_animal(&mut state, AnimalKind::Wolf, Pos::new(12, 11));
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        move_animals(&mut state, &config, &mut rng, MovePass::DayCycle);
        assert_eq!(state.population.animals[0].pos, Pos::new(12, 12));
        assert_eq!(state.pending_attacks, vec![Foe::Animal(wolf)]);
    }

    #[test]
    fn test_combat_foe_is_held_in_place() {
        let (mut state, config) = state_on(Tile::Grass);
        let id = add_animal(&mut state, AnimalKind::Wolf, Pos::new(15, 15));
        state.combat = Some(Combat::new(Foe::Animal(id)));
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        move_animals(&mut state, &config, &mut rng, MovePass::DayCycle);
        assert_eq!(state.population.animals[0].pos, Pos::new(15, 15));
    }

    #[test]
    fn test_bosses_only_move_on_the_day_cycle() {
        let (mut state, config) = state_on(Tile::Peak);
        let id = state.population.next_id();
        state.population.npcs.push(Npc {
            id,
            kind: NpcKind::MadMage,
            pos: Pos::new(15, 15),
            hp: 5,
        });
        let mut lucky = StepRng::new(0, 0);
        move_npcs(&mut state, &config, &mut lucky, MovePass::AfterAction);
        assert_eq!(state.population.npcs[0].pos, Pos::new(15, 15));
        move_npcs(&mut state, &config, &mut lucky, MovePass::DayCycle);
        assert_ne!(state.population.npcs[0].pos, Pos::new(15, 15));
    }

    #[test]
    fn test_hunter_takes_adjacent_prey() {
        let (mut state, config) = state_on(Tile::Tree);
        let id = state.population.next_id();
        state.population.hunters.push(Hunter {
            id,
            kind: HunterKind::Hunter,
            pos: Pos::new(15, 15),
        });
        // Surround the hunter with deer so any direction is a hunt
        for p in Pos::new(15, 15).neighbors4().collect::<Vec<_>>() {
            add_animal(&mut state, AnimalKind::Deer, p);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        move_hunters(&mut state, &config, &mut rng, MovePass::DayCycle);
        assert_eq!(state.population.animals.len(), 3);
        let hunter = state.population.hunters[0].pos;
        assert_eq!(hunter.distance(Pos::new(15, 15)), 1);
        assert!(state.population.animal_at(hunter).is_none());
    }

    #[test]
    fn test_hunters_avoid_danger() {
        let (mut state, config) = state_on(Tile::Tree);
        let id = state.population.next_id();
        state.population.hunters.push(Hunter {
            id,
            kind: HunterKind::Forester,
            pos: Pos::new(15, 15),
        });
        for p in Pos::new(15, 15).neighbors4().collect::<Vec<_>>() {
            add_animal(&mut state, AnimalKind::Wolf, p);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        move_hunters(&mut state, &config, &mut rng, MovePass::DayCycle);
        assert_eq!(state.population.hunters[0].pos, Pos::new(15, 15));
        assert_eq!(state.population.animals.len(), 4);
    }

    #[test]
    fn test_hunters_keep_off_zombies_and_the_player() {
        let (mut state, config) = state_on(Tile::Tree);
        let home = Pos::new(15, 15);
        let id = state.population.next_id();
        state.population.hunters.push(Hunter {
            id,
            kind: HunterKind::Forester,
            pos: home,
        });
        state.world.set(Pos::new(15, 14), Tile::Zombie);
        state.player.pos = Pos::new(16, 15);
        state.world.set(Pos::new(14, 15), Tile::Mountain);
        state.world.set(Pos::new(15, 16), Tile::Mountain);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        for _ in 0..20 {
            move_hunters(&mut state, &config, &mut rng, MovePass::DayCycle);
            assert_eq!(state.population.hunters[0].pos, home);
        }
    }

    #[test]
    fn test_villagers_stay_on_village_floor() {
        let (mut state, config) = state_on(Tile::Grass);
        let id = state.population.next_id();
        state.population.villagers.push(Villager {
            id,
            kind: VillagerKind::Hobbit,
            pos: Pos::new(2, 4),
        });
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        for _ in 0..50 {
            move_villagers(&mut state, &config, &mut rng, MovePass::DayCycle);
            assert!(config.world.village.contains(state.population.villagers[0].pos));
        }
    }

    #[test]
    fn test_rabbit_flees_from_player() {
        let (mut state, config) = state_on(Tile::Grass);
        state.player.pos = Pos::new(12, 12);
        add_animal(&mut state, AnimalKind::Rabbit, Pos::new(13, 12));
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        move_animals(&mut state, &config, &mut rng, MovePass::DayCycle);
        let pos = state.population.animals[0].pos;
        assert_eq!(pos.distance(Pos::new(12, 12)), 2);
    }
}
