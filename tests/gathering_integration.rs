//! Gathering integration tests
//!
//! Resource nodes through whole turns: depletion stages, the one-timer rule,
//! regrowth on day rollover, tool bonuses, quests paid by gathering and house
//! building on the village plot.

use tilequest::actions::{Intent, Item};
use tilequest::core::calendar::STEPS_PER_DAY;
use tilequest::core::config::GameConfig;
use tilequest::core::types::Pos;
use tilequest::player::resources::Resource;
use tilequest::simulation::session::Session;
use tilequest::simulation::state::GameState;
use tilequest::world::grid::WorldGrid;
use tilequest::world::tile::Tile;

/// No roaming creatures and no random events
fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.population.animal_cap = 0;
    config.population.npc_cap = 0;
    config.events.clear();
    config
}

fn session_on(tile: Tile, pos: Pos) -> Session {
    let config = quiet_config();
    let world = WorldGrid::filled(26, 32, 9, tile);
    let state = GameState::from_world(world, &config, pos);
    Session::from_state(state, config, 11)
}

fn run_days(session: &mut Session, days: u32) {
    for _ in 0..days * STEPS_PER_DAY {
        session.advance();
    }
}

#[test]
fn test_tree_depletes_then_regrows() {
    let pos = Pos::new(15, 15);
    let mut session = session_on(Tile::Tree, pos);

    assert!(session.take_turn(Intent::ChopWood));
    assert_eq!(session.state.tile(pos), Some(Tile::Grass));
    assert!(session.take_turn(Intent::ChopWood));
    assert_eq!(session.state.tile(pos), Some(Tile::Stump));
    assert_eq!(session.state.player.resources.get(Resource::Wood), 2);
    assert_eq!(session.state.timers.len(), 1);

    // The stump rests while its timer runs
    assert!(!session.take_turn(Intent::ChopWood));
    assert_eq!(session.state.player.resources.get(Resource::Wood), 2);

    run_days(&mut session, 3);
    assert_eq!(session.state.tile(pos), Some(Tile::Tree));
    assert!(session.state.timers.is_empty());
    assert!(session.take_turn(Intent::ChopWood));
    assert_eq!(session.state.player.resources.get(Resource::Wood), 3);
}

#[test]
fn test_quarry_walks_the_stone_stages() {
    let pos = Pos::new(15, 15);
    let mut session = session_on(Tile::Peak, pos);
    for expected in [Tile::Rock, Tile::Cliff, Tile::Pit] {
        assert!(session.take_turn(Intent::Quarry));
        assert_eq!(session.state.tile(pos), Some(expected));
    }
    assert!(!session.take_turn(Intent::Quarry));
    assert_eq!(session.state.player.resources.get(Resource::Stone), 3);
    let timer = session.state.timers.get(pos).expect("stone timer");
    assert_eq!(timer.restore, Tile::Peak);
}

#[test]
fn test_axe_doubles_the_chop() {
    let mut session = session_on(Tile::Pine, Pos::new(12, 12));
    session.state.player.resources.add(Resource::Wood, 2);
    session.state.player.resources.add(Resource::Stone, 1);
    assert!(session.take_turn(Intent::Craft(Item::Axe)));
    assert_eq!(session.state.player.resources.get(Resource::Wood), 0);
    assert!(session.take_turn(Intent::ChopWood));
    assert_eq!(session.state.player.resources.get(Resource::Wood), 2);
}

#[test]
fn test_wood_quest_pays_out() {
    let mut session = session_on(Tile::Tree, Pos::new(10, 10));
    let config = session.config.clone();
    assert!(session.state.offer_quest(&config, "wood3"));
    for dx in 0..3 {
        session.state.player.pos = Pos::new(10 + dx, 10);
        assert!(session.take_turn(Intent::ChopWood));
    }
    assert!(session.state.quests.is_completed("wood3"));
    assert!(session.state.quests.active.is_empty());
    assert_eq!(session.state.player.resources.get(Resource::Gold), 2);
}

#[test]
fn test_hunted_deer_comes_back() {
    let pos = Pos::new(8, 20);
    let mut session = session_on(Tile::Grass, pos);
    session.state.set_tile(pos, Tile::Deer);
    assert!(session.take_turn(Intent::Hunt));
    assert_eq!(session.state.tile(pos), Some(Tile::Plain));
    let food = session.state.player.resources.get(Resource::Food);
    assert!((1..=2).contains(&food));
    assert!(!session.take_turn(Intent::Hunt));

    run_days(&mut session, 2);
    assert_eq!(session.state.tile(pos), Some(Tile::Deer));
}

#[test]
fn test_fishing_by_the_water() {
    let pos = Pos::new(5, 20);
    let mut session = session_on(Tile::Grass, pos);
    assert!(!session.take_turn(Intent::Fish));
    session.state.set_tile(Pos::new(6, 20), Tile::Water);
    for _ in 0..5 {
        assert!(session.take_turn(Intent::Fish));
    }
    assert!(session.state.player.resources.get(Resource::Fish) <= 10);
}

#[test]
fn test_build_house_on_the_village_plot() {
    let mut session = Session::with_world_seed(quiet_config(), 4242, 3);
    let home = session.config.world.home;
    if session.state.player.pos != home {
        assert!(session.take_turn(Intent::PortalHome));
    }
    assert_eq!(session.state.player.pos, home);
    assert_eq!(session.state.player_tile(), Some(Tile::Sign));

    assert!(!session.take_turn(Intent::BuildHouse));
    session.state.player.resources.add(Resource::Wood, 5);
    session.state.player.resources.add(Resource::Stone, 3);
    session.state.player.resources.add(Resource::Gold, 2);
    assert!(session.take_turn(Intent::BuildHouse));
    assert_eq!(session.state.player_tile(), Some(Tile::Home));
    assert_eq!(session.state.player.resources.get(Resource::Wood), 0);
}
