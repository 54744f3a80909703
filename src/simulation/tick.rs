//! Clock-driven updates
//!
//! Every player action is followed by `after_action` (unless a fight is
//! running) and then `advance`, which moves the clock one step, runs the
//! day cycle on rollover and always ticks status effects.

use rand::Rng;

use crate::combat::resolution::{resolve_contact_attacks, start_combat};
use crate::core::config::GameConfig;
use crate::entity::movement::{move_all, MovePass};
use crate::entity::population::spawn_daily;
use crate::simulation::events::roll_event;
use crate::simulation::history::HistoryEntry;
use crate::simulation::state::GameState;

/// Reduced-probability movement pass after a player action
pub fn after_action<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    if state.in_combat() {
        return;
    }
    move_all(state, config, rng, MovePass::AfterAction);
    resolve_contact_attacks(state, config);
    start_combat(state, config, rng);
}

/// Advance one step. Returns true when a new day began.
pub fn advance<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) -> bool {
    let rolled_over = state.calendar.next_step();
    if rolled_over {
        new_day(state, config, rng);
    }
    tick_status(state, config);
    rolled_over
}

/// Full end-of-day cycle
pub fn new_day<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    let fired = state.timers.tick(&mut state.world);
    for timer in fired {
        state.log(
            HistoryEntry::new("World", format!("{} is back", timer.restore))
                .map(timer.pos.to_string())
                .timer(format!("{:?}", timer.reason).to_lowercase()),
        );
    }

    move_all(state, config, rng, MovePass::DayCycle);
    spawn_daily(state, config, rng);
    roll_event(state, config, rng);
    resolve_contact_attacks(state, config);
    if !state.in_combat() {
        start_combat(state, config, rng);
    }

    state.calendar.begin_next_day();
    let healed = state.player.heal(1);
    let mut entry = HistoryEntry::new("World", format!("Day {} begins", state.calendar.day()));
    if healed > 0 {
        entry = entry.gained(format!("+{}❤️", healed));
    }
    state.log(entry);
    tracing::info!(day = state.calendar.day(), hp = state.player.hp, "new day");
}

/// Apply damage-over-time and expire finished effects
pub fn tick_status(state: &mut GameState, config: &GameConfig) {
    if state.player.effects.is_empty() {
        return;
    }
    let hits = state.player.effects.tick(&config.status);
    for hit in hits.into_iter().filter(|h| h.damage > 0) {
        let hp = state.player.take_damage(hit.damage);
        state.log(
            HistoryEntry::new(
                &state.player.name,
                format!("{} {} hurts ({} HP left)", hit.kind.icon(), hit.kind.name(), hp),
            )
            .gained(format!("-{}❤️", hit.damage)),
        );
    }
    state.handle_death(config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::{Calendar, STEPS_PER_DAY};
    use crate::core::types::Pos;
    use crate::player::status::StatusKind;
    use crate::world::grid::WorldGrid;
    use crate::world::tile::Tile;
    use crate::world::timers::TimerReason;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn quiet_state() -> (GameState, GameConfig) {
        let mut config = GameConfig::default();
        config.events.clear();
        config.population.animal_cap = 0;
        config.population.npc_cap = 0;
        let world = WorldGrid::filled(26, 32, 1, Tile::Wheat);
        let state = GameState::from_world(world, &config, Pos::new(20, 20));
        (state, config)
    }

    #[test]
    fn test_fifty_steps_make_a_day() {
        let (mut state, config) = quiet_state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut rollovers = 0;
        for _ in 0..STEPS_PER_DAY {
            if advance(&mut state, &config, &mut rng) {
                rollovers += 1;
            }
        }
        assert_eq!(rollovers, 1);
        assert_eq!(state.calendar.day(), 2);
        assert_eq!(state.calendar.step(), 0);
    }

    #[test]
    fn test_new_day_heals_one_capped() {
        let (mut state, config) = quiet_state();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        state.player.hp = 5;
        new_day(&mut state, &config, &mut rng);
        assert_eq!(state.player.hp, 6);
        state.player.hp = state.player.max_hp;
        new_day(&mut state, &config, &mut rng);
        assert_eq!(state.player.hp, state.player.max_hp);
    }

    #[test]
    fn test_new_day_ticks_timers() {
        let (mut state, config) = quiet_state();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let pos = Pos::new(10, 10);
        state.set_tile(pos, Tile::Stump);
        state.timers.add(pos, Tile::Tree, 1, TimerReason::Wood);
        new_day(&mut state, &config, &mut rng);
        assert_eq!(state.tile(pos), Some(Tile::Tree));
        assert!(state.timers.is_empty());
    }

    #[test]
    fn test_status_ticks_every_step() {
        let (mut state, config) = quiet_state();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        state.player.effects.apply(StatusKind::Poison, 2);
        advance(&mut state, &config, &mut rng);
        assert_eq!(state.player.hp, 9);
        advance(&mut state, &config, &mut rng);
        assert_eq!(state.player.hp, 8);
        advance(&mut state, &config, &mut rng);
        assert_eq!(state.player.hp, 8);
        assert!(state.player.effects.is_empty());
    }

    #[test]
    fn test_status_damage_can_kill() {
        let (mut state, config) = quiet_state();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        state.player.hp = 1;
        state.player.effects.apply(StatusKind::Bleeding, 3);
        advance(&mut state, &config, &mut rng);
        assert_eq!(state.player.pos, config.world.hospital);
        assert_eq!(state.player.hp, state.player.max_hp);
    }

    #[test]
    fn test_after_action_skipped_in_combat() {
        let (mut state, config) = quiet_state();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        state.calendar = Calendar::from_parts(1, 10);
        state.set_tile(Pos::new(20, 20), Tile::Zombie);
        after_action(&mut state, &config, &mut rng);
        assert!(state.in_combat());
        let log_len = state.combat_log.len();
        after_action(&mut state, &config, &mut rng);
        assert_eq!(state.combat_log.len(), log_len);
    }
}
