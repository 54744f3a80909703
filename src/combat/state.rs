//! Combat session state
//!
//! At most one fight is active. `GameState::combat` is `None` while idle.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::str::FromStr;

use crate::combat::constants::COMBAT_LOG_CAPACITY;
use crate::core::error::GameError;
use crate::core::types::{EntityId, Pos};

/// The enemy being fought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Foe {
    /// Zombies are tiles; their HP only exists for the fight
    Zombie { pos: Pos, hp: i32 },
    Npc(EntityId),
    Animal(EntityId),
}

impl Foe {
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            Foe::Zombie { .. } => None,
            Foe::Npc(id) | Foe::Animal(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combat {
    pub foe: Foe,
    /// Turns taken so far
    #[serde(default)]
    pub round: u32,
}

impl Combat {
    pub fn new(foe: Foe) -> Self {
        Self { foe, round: 0 }
    }
}

/// Player choice for one combat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatAction {
    Attack,
    Defend,
    Run,
}

impl FromStr for CombatAction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "attack" | "hit" => Ok(CombatAction::Attack),
            "d" | "defend" | "block" => Ok(CombatAction::Defend),
            "r" | "run" | "flee" => Ok(CombatAction::Run),
            other => Err(GameError::UnknownAction(other.to_string())),
        }
    }
}

/// Short log of the current fight, newest line first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatLog {
    lines: VecDeque<String>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_front(line.into());
        self.lines.truncate(COMBAT_LOG_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}
