//! Weighted random world events rolled once per day

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::loot::roll_range;
use crate::core::config::GameConfig;
use crate::player::resources::Resource;
use crate::simulation::history::HistoryEntry;
use crate::simulation::state::GameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    pub text: String,
    pub weight: f64,
    /// Gold granted when the event fires (inclusive range)
    #[serde(default)]
    pub gold: Option<(u32, u32)>,
    /// Quest offered when the event fires
    #[serde(default)]
    pub quest: Option<String>,
}

impl WorldEvent {
    fn flavour(text: &str, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
            gold: None,
            quest: None,
        }
    }

    fn quest(text: &str, weight: f64, id: &str) -> Self {
        Self {
            quest: Some(id.into()),
            ..Self::flavour(text, weight)
        }
    }

    pub fn defaults() -> Vec<WorldEvent> {
        vec![
            Self::flavour("Merchants pass by the village", 1.0),
            Self::flavour("Clouds gather on the horizon", 1.0),
            Self {
                gold: Some((0, 2)),
                ..Self::flavour("A parcel waits at the gate", 0.5)
            },
            Self::flavour("The forest beasts are restless", 1.0),
            Self::flavour("Singing drifts in from afar", 0.8),
            Self::quest("The quest master needs wood", 0.6, "wood3"),
            Self::quest("The quest master needs food", 0.5, "food2"),
            Self::quest("The quest master needs stone", 0.5, "stone2"),
            Self::quest("The quest master needs fish", 0.4, "fish3"),
        ]
    }
}

/// Roll one event and apply it. Returns the index of the event that fired.
pub fn roll_event<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) -> Option<usize> {
    let weights = config.events.iter().map(|e| e.weight.max(0.0));
    let dist = WeightedIndex::new(weights).ok()?;
    let idx = dist.sample(rng);
    let event = &config.events[idx];

    if let Some(id) = &event.quest {
        if state.quests.is_active(id) || state.quests.is_completed(id) {
            tracing::debug!(quest = %id, "quest event skipped");
            return None;
        }
        state.log(HistoryEntry::new("World", event.text.clone()).gained("📜"));
        state.offer_quest(config, id);
        return Some(idx);
    }

    let mut entry = HistoryEntry::new("World", event.text.clone());
    if let Some(range) = event.gold {
        let gold = roll_range(rng, range);
        if gold > 0 {
            entry = entry.gained(format!("+{}{}", gold, Resource::Gold.icon()));
        }
        state.log(entry);
        state.gain(config, Resource::Gold, gold);
    } else {
        state.log(entry);
    }
    Some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pos;
    use crate::world::grid::WorldGrid;
    use crate::world::tile::Tile;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state(config: &GameConfig) -> GameState {
        GameState::from_world(WorldGrid::filled(10, 10, 1, Tile::Grass), config, Pos::new(5, 5))
    }

    #[test]
    fn test_default_weights() {
        let events = WorldEvent::defaults();
        let total: f64 = events.iter().map(|e| e.weight).sum();
        assert!((total - 6.3).abs() < 1e-9);
    }

    #[test]
    fn test_single_quest_event_offers_quest_once() {
        let mut config = GameConfig::default();
        config.events = vec![WorldEvent::quest("Need fish", 1.0, "fish3")];
        let mut state = state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(roll_event(&mut state, &config, &mut rng), Some(0));
        assert!(state.quests.is_active("fish3"));
        assert_eq!(roll_event(&mut state, &config, &mut rng), None);
        assert_eq!(state.quests.active.len(), 1);
    }

    #[test]
    fn test_gold_event_pays_within_range() {
        let mut config = GameConfig::default();
        config.events = vec![WorldEvent {
            gold: Some((1, 2)),
            ..WorldEvent::flavour("Parcel", 1.0)
        }];
        let mut state = state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        roll_event(&mut state, &config, &mut rng);
        let gold = state.player.resources.get(Resource::Gold);
        assert!((1..=2).contains(&gold));
    }

    #[test]
    fn test_no_events_is_quiet() {
        let mut config = GameConfig::default();
        config.events.clear();
        let mut state = state(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(roll_event(&mut state, &config, &mut rng), None);
        assert!(state.history.is_empty());
    }
}
