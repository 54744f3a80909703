//! World integration tests
//!
//! Property checks for the pieces that must be pure or exactly bounded: the
//! seeded generator and its infinite extension, the step clock, and the
//! regeneration timers.

use proptest::prelude::*;

use tilequest::core::calendar::{Calendar, Phase, STEPS_PER_DAY};
use tilequest::core::config::GameConfig;
use tilequest::core::types::Pos;
use tilequest::world::generation::tile_at;
use tilequest::world::grid::WorldGrid;
use tilequest::world::tile::Tile;
use tilequest::world::timers::{TimerReason, TimerRegistry};

fn generate(seed: u32) -> WorldGrid {
    let w = GameConfig::default().world;
    WorldGrid::generate(w.width, w.height, seed, w.village).0
}

proptest! {
    #[test]
    fn prop_wilderness_is_pure(seed in any::<u32>(), x in 1i32..5000, y in 1i32..5000) {
        let pos = Pos::new(x, y);
        prop_assert_eq!(tile_at(pos, seed), tile_at(pos, seed));
    }

    #[test]
    fn prop_grid_is_reproducible(seed in any::<u32>()) {
        let a = generate(seed);
        let b = generate(seed);
        for pos in a.positions() {
            prop_assert_eq!(a.get(pos), b.get(pos));
        }
    }

    #[test]
    fn prop_beyond_grid_uses_raw_mapping(seed in any::<u32>(), dx in 1i32..200, y in 1i32..200) {
        let grid = generate(seed);
        let pos = Pos::new(grid.width() + dx, y);
        prop_assert_eq!(grid.get(pos), Some(tile_at(pos, seed)));
    }

    #[test]
    fn prop_phase_matches_step(steps in 0u32..500) {
        let mut calendar = Calendar::new();
        let mut rollovers = 0;
        for _ in 0..steps {
            if calendar.next_step() {
                calendar.begin_next_day();
                rollovers += 1;
            }
        }
        prop_assert_eq!(rollovers, steps / STEPS_PER_DAY);
        prop_assert_eq!(calendar.step(), steps % STEPS_PER_DAY);
        prop_assert_eq!(calendar.day(), 1 + steps / STEPS_PER_DAY);
        let expected = match calendar.step() {
            0..=19 => Phase::Day,
            20..=29 => Phase::Dusk,
            30..=39 => Phase::Night,
            _ => Phase::Dawn,
        };
        prop_assert_eq!(calendar.phase(), expected);
    }

    #[test]
    fn prop_timer_fires_after_exactly_its_days(days in 1u32..10) {
        let mut world = WorldGrid::filled(8, 8, 1, Tile::Stump);
        let mut timers = TimerRegistry::new();
        let pos = Pos::new(4, 4);
        prop_assert!(timers.add(pos, Tile::Tree, days, TimerReason::Wood));
        for _ in 1..days {
            prop_assert!(timers.tick(&mut world).is_empty());
            prop_assert_eq!(world.get(pos), Some(Tile::Stump));
        }
        let fired = timers.tick(&mut world);
        prop_assert_eq!(fired.len(), 1);
        prop_assert_eq!(world.get(pos), Some(Tile::Tree));
        prop_assert!(timers.is_empty());
    }
}

#[test]
fn test_world_edge_is_none() {
    let grid = generate(4242);
    assert_eq!(grid.get(Pos::new(0, 5)), None);
    assert_eq!(grid.get(Pos::new(5, 0)), None);
    assert!(grid.get(Pos::new(1, 1)).is_some());
}

#[test]
fn test_writes_beyond_grid_persist_in_overlay() {
    let mut grid = generate(4242);
    let far = Pos::new(grid.width() + 40, 3);
    grid.set(far, Tile::Home);
    assert_eq!(grid.get(far), Some(Tile::Home));
    assert_eq!(grid.overlay_len(), 1);
}

#[test]
fn test_village_is_stamped_for_every_seed() {
    let config = GameConfig::default();
    for seed in [1, 77, 4242, 99_999] {
        let grid = generate(seed);
        assert_eq!(grid.get(config.world.hospital), Some(Tile::Hospital));
        assert_eq!(grid.get(config.world.home), Some(Tile::Sign));
    }
}

#[test]
fn test_one_active_timer_per_cell() {
    let mut timers = TimerRegistry::new();
    let pos = Pos::new(2, 2);
    assert!(timers.add(pos, Tile::Tree, 3, TimerReason::Wood));
    assert!(!timers.add(pos, Tile::Peak, 1, TimerReason::Stone));
    assert_eq!(timers.len(), 1);
}
