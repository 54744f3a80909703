//! Delivery quests advanced by resource gains

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::player::resources::Resource;

/// Quest definition from the config table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestSpec {
    pub id: String,
    pub name: String,
    pub objectives: Vec<(Resource, u32)>,
    pub reward_gold: u32,
}

impl QuestSpec {
    pub fn new(id: &str, name: &str, objectives: Vec<(Resource, u32)>, reward_gold: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            objectives,
            reward_gold,
        }
    }

    /// Default quest table
    pub fn defaults() -> Vec<QuestSpec> {
        vec![
            QuestSpec::new("wood3", "3🪵 → 2💰", vec![(Resource::Wood, 3)], 2),
            QuestSpec::new("food2", "2🍖 → 1💰", vec![(Resource::Food, 2)], 1),
            QuestSpec::new("stone2", "2🪨 → 1💰", vec![(Resource::Stone, 2)], 1),
            QuestSpec::new("fish3", "3🐟 → 2💰", vec![(Resource::Fish, 3)], 2),
        ]
    }

    fn is_met(&self, progress: &BTreeMap<Resource, u32>) -> bool {
        self.objectives
            .iter()
            .all(|(res, need)| progress.get(res).copied().unwrap_or(0) >= *need)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuest {
    pub id: String,
    #[serde(default)]
    pub progress: BTreeMap<Resource, u32>,
}

/// Active and completed quests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestLog {
    pub active: Vec<ActiveQuest>,
    pub completed: Vec<String>,
}

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|q| q.id == id)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c == id)
    }

    /// Start a quest unless it is already running. Returns true if started.
    pub fn offer(&mut self, id: &str) -> bool {
        if self.is_active(id) {
            return false;
        }
        self.active.push(ActiveQuest {
            id: id.to_string(),
            progress: BTreeMap::new(),
        });
        true
    }

    /// Credit a resource gain to every quest that asks for it. Quests whose
    /// objectives are all met move to the completed list and are returned so
    /// the caller can pay the reward.
    pub fn record_gain<'a>(
        &mut self,
        resource: Resource,
        amount: u32,
        specs: &'a [QuestSpec],
    ) -> Vec<&'a QuestSpec> {
        if amount == 0 {
            return Vec::new();
        }
        let mut finished = Vec::new();
        for quest in &mut self.active {
            let Some(spec) = specs.iter().find(|s| s.id == quest.id) else {
                continue;
            };
            if !spec.objectives.iter().any(|(r, _)| *r == resource) {
                continue;
            }
            *quest.progress.entry(resource).or_insert(0) += amount;
            if spec.is_met(&quest.progress) {
                finished.push(spec);
            }
        }
        for spec in &finished {
            self.active.retain(|q| q.id != spec.id);
            self.completed.push(spec.id.clone());
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_once() {
        let mut log = QuestLog::new();
        assert!(log.offer("wood3"));
        assert!(!log.offer("wood3"));
        assert_eq!(log.active.len(), 1);
    }

    #[test]
    fn test_progress_completes_quest() {
        let specs = QuestSpec::defaults();
        let mut log = QuestLog::new();
        log.offer("wood3");
        log.offer("fish3");

        assert!(log.record_gain(Resource::Wood, 2, &specs).is_empty());
        assert!(log.record_gain(Resource::Stone, 5, &specs).is_empty());
        let done = log.record_gain(Resource::Wood, 1, &specs);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].reward_gold, 2);
        assert!(log.is_completed("wood3"));
        assert!(!log.is_active("wood3"));
        assert!(log.is_active("fish3"));
    }

    #[test]
    fn test_unknown_quest_is_ignored() {
        let specs = QuestSpec::defaults();
        let mut log = QuestLog::new();
        log.offer("retired");
        assert!(log.record_gain(Resource::Wood, 10, &specs).is_empty());
        assert!(log.is_active("retired"));
    }
}
