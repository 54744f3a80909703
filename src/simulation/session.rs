//! A running game: state, config and the one shared RNG
//!
//! The RNG is seeded from a `u64` so a whole session replays exactly.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

use crate::actions::{perform, Intent};
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::simulation::snapshot;
use crate::simulation::state::GameState;
use crate::simulation::tick::advance;

pub struct Session {
    pub state: GameState,
    pub config: GameConfig,
    rng: ChaCha8Rng,
}

impl Session {
    /// New game with a world seed drawn from the session RNG
    pub fn new(config: GameConfig, rng_seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
        let state = GameState::new_game(&config, &mut rng);
        Self { state, config, rng }
    }

    pub fn with_world_seed(config: GameConfig, world_seed: u32, rng_seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
        let state = GameState::with_seed(&config, world_seed, &mut rng);
        Self { state, config, rng }
    }

    pub fn from_state(state: GameState, config: GameConfig, rng_seed: u64) -> Self {
        Self {
            state,
            config,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
        }
    }

    /// Perform an action without moving the clock
    pub fn act(&mut self, intent: Intent) -> bool {
        perform(&mut self.state, &self.config, &mut self.rng, intent)
    }

    /// Move the clock one step. Returns true when a new day began.
    pub fn advance(&mut self) -> bool {
        advance(&mut self.state, &self.config, &mut self.rng)
    }

    /// One full turn: the action, then one clock step whether or not it succeeded
    pub fn take_turn(&mut self, intent: Intent) -> bool {
        let ok = self.act(intent);
        self.advance();
        ok
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        snapshot::save(&self.state, path)
    }

    pub fn load(path: &Path, config: GameConfig, rng_seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
        let state = snapshot::load(path, &config, &mut rng)?;
        Ok(Self { state, config, rng })
    }
}
