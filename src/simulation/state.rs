//! The single in-memory simulation state
//!
//! Everything a save file holds lives here. Engine functions take
//! `&mut GameState` plus the config and the shared RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::combat::state::{Combat, CombatLog, Foe};
use crate::core::calendar::Calendar;
use crate::core::config::GameConfig;
use crate::core::types::Pos;
use crate::entity::population::{self, Population};
use crate::player::quest::QuestLog;
use crate::player::resources::Resource;
use crate::player::Player;
use crate::simulation::history::{HistoryEntry, HistoryLog};
use crate::world::grid::WorldGrid;
use crate::world::tile::Tile;
use crate::world::timers::{TimerReason, TimerRegistry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// World seed; the grid and the infinite extension derive from it
    pub seed: u32,
    pub world: WorldGrid,
    pub timers: TimerRegistry,
    pub population: Population,
    pub player: Player,
    pub calendar: Calendar,
    pub combat: Option<Combat>,
    pub combat_log: CombatLog,
    pub history: HistoryLog,
    pub quests: QuestLog,
    /// Fog of war: cells the player has seen
    pub revealed: BTreeSet<Pos>,
    /// Hostiles that walked onto the player during the last movement pass
    #[serde(skip)]
    pub pending_attacks: Vec<Foe>,
}

impl GameState {
    /// New game with a seed drawn from the RNG
    pub fn new_game<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        let seed = rng.gen::<u32>();
        Self::with_seed(config, seed, rng)
    }

    /// New game on a fixed world seed
    pub fn with_seed<R: Rng>(config: &GameConfig, seed: u32, rng: &mut R) -> Self {
        let w = &config.world;
        let (world, graves) = WorldGrid::generate(w.width, w.height, seed, w.village);
        let start = start_position(&world).unwrap_or(w.hospital);
        let mut state = Self::from_world(world, config, start);

        for grave in graves {
            state
                .timers
                .add(grave, Tile::Zombie, config.zombie.respawn_days, TimerReason::Zombie);
        }
        population::spawn_initial(&mut state, config, rng);
        state.reveal_around(config);
        state.log(HistoryEntry::new("World", format!("Day {} begins", state.calendar.day())).gained("☀️"));
        tracing::info!(seed, start = %start, "new game");
        state
    }

    /// Bare state over an existing grid: no actors, no timers
    pub fn from_world(world: WorldGrid, config: &GameConfig, player_pos: Pos) -> Self {
        Self {
            seed: world.seed(),
            world,
            timers: TimerRegistry::new(),
            population: Population::new(),
            player: Player::new(&config.player, player_pos),
            calendar: Calendar::new(),
            combat: None,
            combat_log: CombatLog::new(),
            history: HistoryLog::new(),
            quests: QuestLog::new(),
            revealed: BTreeSet::new(),
            pending_attacks: Vec::new(),
        }
    }

    /// Append to the history, stamped with the current day and step
    pub fn log(&mut self, entry: HistoryEntry) {
        let entry = entry.stamped(self.calendar.day(), self.calendar.step());
        tracing::debug!(actor = %entry.actor, "{}", entry.description);
        self.history.push(entry);
    }

    pub fn combat_note(&mut self, line: impl Into<String>) {
        self.combat_log.push(line);
    }

    /// Add a resource and credit it to active quests, paying out any that finish
    pub fn gain(&mut self, config: &GameConfig, resource: Resource, amount: u32) {
        if amount == 0 {
            return;
        }
        self.player.resources.add(resource, amount);
        let finished: Vec<(String, u32)> = self
            .quests
            .record_gain(resource, amount, &config.quests)
            .into_iter()
            .map(|q| (q.name.clone(), q.reward_gold))
            .collect();
        for (name, reward) in finished {
            self.player.resources.add(Resource::Gold, reward);
            tracing::info!(quest = %name, reward, "quest completed");
            self.log(
                HistoryEntry::new("Quest master", format!("Quest complete: {}", name))
                    .gained(format!("+{}{}", reward, Resource::Gold.icon())),
            );
        }
    }

    /// Pay a cost in full or not at all
    pub fn spend(&mut self, cost: &[(Resource, u32)]) -> bool {
        self.player.resources.spend(cost)
    }

    /// Offer a quest by id; refused when it is already active
    pub fn offer_quest(&mut self, config: &GameConfig, id: &str) -> bool {
        let Some(spec) = config.quest(id) else {
            return false;
        };
        if !self.quests.offer(id) {
            return false;
        }
        let name = spec.name.clone();
        self.log(HistoryEntry::new("Quest master", format!("New quest: {}", name)).gained("📜"));
        true
    }

    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        self.world.get(pos)
    }

    pub fn set_tile(&mut self, pos: Pos, tile: Tile) {
        self.world.set(pos, tile);
    }

    pub fn player_tile(&self) -> Option<Tile> {
        self.world.get(self.player.pos)
    }

    /// Mark the square around the player as seen
    pub fn reveal_around(&mut self, config: &GameConfig) {
        let r = config.world.reveal_radius;
        let center = self.player.pos;
        for dy in -r..=r {
            for dx in -r..=r {
                let pos = Pos::new(center.x + dx, center.y + dy);
                if pos.on_map() {
                    self.revealed.insert(pos);
                }
            }
        }
    }

    pub fn is_revealed(&self, pos: Pos) -> bool {
        self.revealed.contains(&pos)
    }

    /// Respawn at the hospital if HP reached zero. Returns true when the player died.
    pub fn handle_death(&mut self, config: &GameConfig) -> bool {
        if !self.player.is_dead() {
            return false;
        }
        let died_at = self.player.pos;
        self.player.revive_at(config.world.hospital);
        self.combat = None;
        self.pending_attacks.clear();
        self.combat_note("You fell... and wake up in the hospital.");
        self.log(
            HistoryEntry::new(&self.player.name, "Died and woke up in the hospital")
                .gained("💀")
                .map(format!("{} -> {}", died_at, config.world.hospital)),
        );
        self.reveal_around(config);
        tracing::warn!(at = %died_at, "player died");
        true
    }

    pub fn in_combat(&self) -> bool {
        self.combat.is_some()
    }
}

/// First walkable cell scanning rows top to bottom
fn start_position(world: &WorldGrid) -> Option<Pos> {
    (1..=world.height())
        .flat_map(|y| (1..=world.width()).map(move |x| Pos::new(x, y)))
        .find(|p| world.get(*p).map_or(false, |t| t.is_walkable()))
}
