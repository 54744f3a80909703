//! Combat turn resolution
//!
//! Idle -> InCombat when the player shares a tile with an enemy outside the
//! village. Each turn the player attacks, defends or runs and the enemy
//! answers unless it died or the player escaped. Death of either side ends
//! the fight.

use rand::Rng;

use crate::actions::crafting::Perk;
use crate::combat::equipment::{effective_armor, effective_attack, has_perk};
use crate::combat::loot::{self, roll_creature_loot, roll_range, roll_zombie_loot, Loot};
use crate::combat::state::{Combat, CombatAction, Foe};
use crate::core::config::GameConfig;
use crate::core::types::Pos;
use crate::entity::kinds::CreatureSpec;
use crate::player::status::StatusKind;
use crate::simulation::history::HistoryEntry;
use crate::simulation::state::GameState;
use crate::world::tile::Tile;
use crate::world::timers::TimerReason;

const ZOMBIE_NAME: &str = "Zombie";

/// Enemy standing on `pos`, if any. The village is always safe.
pub fn foe_at(state: &GameState, config: &GameConfig, pos: Pos) -> Option<Foe> {
    if config.world.village.contains(pos) {
        return None;
    }
    if state.world.get(pos) == Some(Tile::Zombie) {
        return Some(Foe::Zombie {
            pos,
            hp: config.zombie.hp,
        });
    }
    if let Some(npc) = state.population.npc_at(pos) {
        return Some(Foe::Npc(npc.id));
    }
    state
        .population
        .animal_at(pos)
        .filter(|a| config.animals.spec(a.kind).is_hostile())
        .map(|a| Foe::Animal(a.id))
}

pub fn enemy_on_tile(state: &GameState, config: &GameConfig) -> Option<Foe> {
    foe_at(state, config, state.player.pos)
}

fn creature_spec<'a>(state: &GameState, config: &'a GameConfig, foe: Foe) -> Option<&'a CreatureSpec> {
    match foe {
        Foe::Zombie { .. } => None,
        Foe::Npc(id) => state.population.npc(id).map(|n| config.npcs.spec(n.kind)),
        Foe::Animal(id) => state.population.animal(id).map(|a| config.animals.spec(a.kind)),
    }
}

/// Display name and symbol of a foe
pub fn foe_label(state: &GameState, config: &GameConfig, foe: Foe) -> (String, String) {
    match creature_spec(state, config, foe) {
        Some(spec) => (spec.name.clone(), spec.symbol.clone()),
        None => (ZOMBIE_NAME.to_string(), Tile::Zombie.symbol().to_string()),
    }
}

fn foe_hp(state: &GameState, foe: Foe) -> Option<i32> {
    match foe {
        Foe::Zombie { hp, .. } => Some(hp),
        Foe::Npc(id) => state.population.npc(id).map(|n| n.hp),
        Foe::Animal(id) => state.population.animal(id).map(|a| a.hp),
    }
}

/// Subtract damage from the foe and return its remaining HP
fn wound_foe(state: &mut GameState, combat: &mut Combat, damage: i32) -> Option<i32> {
    match &mut combat.foe {
        Foe::Zombie { hp, .. } => {
            *hp -= damage;
            Some(*hp)
        }
        Foe::Npc(id) => state.population.npc_mut(*id).map(|n| {
            n.hp -= damage;
            n.hp
        }),
        Foe::Animal(id) => state.population.animal_mut(*id).map(|a| {
            a.hp -= damage;
            a.hp
        }),
    }
}

/// Enter combat with whatever stands on the player's tile.
/// Returns true when a fight is (or already was) running.
pub fn start_combat<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) -> bool {
    if state.combat.is_some() {
        return true;
    }
    let Some(foe) = enemy_on_tile(state, config) else {
        return false;
    };
    let (name, symbol) = foe_label(state, config, foe);
    let first_strike = creature_spec(state, config, foe).map_or(false, |s| s.attacks_first);

    state.combat = Some(Combat::new(foe));
    state.combat_log.clear();
    state.combat_note(format!("{} {} blocks your way!", symbol, name));
    state.log(
        HistoryEntry::new(&name, format!("{} {} attacks!", symbol, name))
            .gained("⚔️")
            .map(state.player.pos.to_string()),
    );
    tracing::info!(foe = %name, pos = %state.player.pos, "combat started");

    if first_strike {
        state.combat_note(format!("{} strikes first!", name));
        enemy_strike(state, config, rng, true);
    }
    true
}

/// Resolve one player turn. Returns false when there is no fight to act in.
pub fn combat_turn<R: Rng>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    action: CombatAction,
) -> bool {
    let Some(mut combat) = state.combat else {
        state.log(HistoryEntry::new(&state.player.name, "There is nothing to fight").gained("❌"));
        return false;
    };
    if foe_hp(state, combat.foe).is_none() {
        // The foe left the world (hunted, or dropped from a repaired save)
        state.combat = None;
        state.combat_note("Your foe is gone.");
        return false;
    }
    combat.round += 1;
    let (name, _) = foe_label(state, config, combat.foe);

    match action {
        CombatAction::Run => {
            if rng.gen_bool(config.combat.run_chance) {
                state.combat = None;
                state.combat_note("You got away!");
                state.log(HistoryEntry::new(&state.player.name, format!("Fled from {}", name)).gained("🏃"));
                tracing::info!(foe = %name, "player escaped");
                return true;
            }
            state.combat = Some(combat);
            state.combat_note("You could not get away!");
            enemy_strike(state, config, rng, false);
        }
        CombatAction::Defend => {
            state.combat = Some(combat);
            state.combat_note("You raise your guard.");
            enemy_strike(state, config, rng, true);
        }
        CombatAction::Attack => {
            let mut damage = effective_attack(&state.player, &config.catalog);
            let dodge = creature_spec(state, config, combat.foe).map_or(0.0, |s| s.dodge_chance);
            if state.player.effects.has(StatusKind::Fear) && rng.gen_bool(config.status.fear_miss_chance) {
                damage = 0;
                state.combat_note(format!("{} Fear freezes your hand!", StatusKind::Fear.icon()));
            } else if dodge > 0.0 && rng.gen_bool(dodge) {
                damage = 0;
                state.combat_note(format!("{} dodges your blow!", name));
            }

            let Some(hp_left) = wound_foe(state, &mut combat, damage) else {
                state.combat = None;
                return false;
            };
            if damage > 0 {
                state.combat_note(format!(
                    "You hit {} for {} ({} HP left)",
                    name,
                    damage,
                    hp_left.max(0)
                ));
            }
            if hp_left <= 0 {
                defeat(state, config, rng, combat.foe);
                return true;
            }
            state.combat = Some(combat);
            enemy_strike(state, config, rng, false);
        }
    }
    true
}

/// The enemy's blow against the player
pub fn enemy_strike<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R, defending: bool) {
    let Some(combat) = state.combat else {
        return;
    };
    let (name, _) = foe_label(state, config, combat.foe);

    if has_perk(&state.player, &config.catalog, Perk::Luck) && rng.gen_bool(config.combat.luck_dodge_chance) {
        state.combat_note(format!("Your luck ring turns aside the {}'s blow!", name));
        return;
    }

    let mut on_hit: &[(StatusKind, f64)] = &[];
    let mut damage = match creature_spec(state, config, combat.foe) {
        None => {
            let zombie = &config.zombie;
            if !rng.gen_bool(zombie.accuracy) {
                state.combat_note(format!("{} misses!", name));
                return;
            }
            let mut dmg = roll_range(rng, zombie.damage) as i32;
            if state.calendar.phase().is_dark() {
                dmg += zombie.dark_bonus;
            }
            dmg
        }
        Some(spec) => {
            on_hit = &spec.on_hit;
            (spec.attack - effective_armor(&state.player, &config.catalog)).max(1)
        }
    };
    if defending {
        damage = ((damage as f64 * config.combat.defend_factor).floor() as i32).max(1);
    }

    let hp = state.player.take_damage(damage);
    state.combat_note(format!("{} hits you for {} ({} HP left)", name, damage, hp));

    for (kind, chance) in on_hit {
        if rng.gen_bool(*chance) {
            let spec = config.status.spec(*kind);
            if spec.duration > 0 {
                state.player.effects.apply(*kind, spec.duration);
                state.combat_note(format!("{} You suffer {}!", kind.icon(), kind.name()));
            }
        }
    }
    state.handle_death(config);
}

/// Remove the defeated foe, pay out loot and return to idle
fn defeat<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R, foe: Foe) {
    let (name, symbol) = foe_label(state, config, foe);
    let mut entry = HistoryEntry::new(&state.player.name, format!("Defeated {} {}", symbol, name));

    let loot: Loot = match foe {
        Foe::Zombie { pos, .. } => {
            state.set_tile(pos, Tile::Grave);
            let days = config.zombie.respawn_days;
            if state.timers.add(pos, Tile::Zombie, days, TimerReason::Zombie) {
                entry = entry.timer(format!("{} rises in {} days", Tile::Zombie, days));
            }
            entry = entry.map(format!("{} -> {}", Tile::Zombie, Tile::Grave));
            roll_zombie_loot(&config.zombie, rng)
        }
        Foe::Npc(id) => match state.population.remove_npc(id) {
            Some(npc) => roll_creature_loot(&config.npcs.spec(npc.kind).loot, &config.combat.special_loot, rng),
            None => Loot::default(),
        },
        Foe::Animal(id) => match state.population.remove_animal(id) {
            Some(animal) => roll_creature_loot(
                &config.animals.spec(animal.kind).loot,
                &config.combat.special_loot,
                rng,
            ),
            None => Loot::default(),
        },
    };

    state.combat = None;
    let summary = loot.summary();
    state.combat_note(format!("{} is defeated! Loot: {}", name, summary));
    state.log(entry.gained(summary));
    tracing::info!(foe = %name, gold = loot.gold, food = loot.food, "enemy defeated");
    loot::grant(state, config, &loot);
}

/// Apply hits from hostiles that walked onto the player during a movement pass
pub fn resolve_contact_attacks(state: &mut GameState, config: &GameConfig) {
    let attacks = std::mem::take(&mut state.pending_attacks);
    for foe in attacks {
        let Some(spec) = creature_spec(state, config, foe) else {
            continue;
        };
        let damage = (spec.attack - effective_armor(&state.player, &config.catalog)).max(1);
        let name = spec.name.clone();
        let symbol = spec.symbol.clone();
        let hp = state.player.take_damage(damage);
        state.log(
            HistoryEntry::new(&name, format!("{} {} attacks you ({} HP left)", symbol, name, hp))
                .gained(format!("-{}❤️", damage)),
        );
        tracing::debug!(foe = %name, damage, "contact attack");
        if state.handle_death(config) {
            break;
        }
    }
}
