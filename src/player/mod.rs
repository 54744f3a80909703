//! The player: position, health, inventory, resources and status effects

pub mod quest;
pub mod resources;
pub mod status;

use serde::{Deserialize, Serialize};

use crate::actions::crafting::Item;
use crate::core::types::Pos;

pub use quest::{ActiveQuest, QuestLog, QuestSpec};
pub use resources::{Resource, Resources};
pub use status::{StatusEffect, StatusEffects, StatusKind, StatusTable};

/// Starting stats for a new player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,
    pub max_hp: i32,
    pub attack: i32,
    pub armor: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "Hero".into(),
            max_hp: 10,
            attack: 2,
            armor: 1,
        }
    }
}

/// Fields missing from a save take the starting stats; a missing position
/// lies past the world edge and is moved to the hospital on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub pos: Pos,
    #[serde(default = "default_max_hp")]
    pub hp: i32,
    #[serde(default = "default_max_hp")]
    pub max_hp: i32,
    #[serde(default = "default_attack")]
    pub attack: i32,
    #[serde(default = "default_armor")]
    pub armor: i32,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub effects: StatusEffects,
}

fn default_name() -> String {
    PlayerConfig::default().name
}

fn default_max_hp() -> i32 {
    PlayerConfig::default().max_hp
}

fn default_attack() -> i32 {
    PlayerConfig::default().attack
}

fn default_armor() -> i32 {
    PlayerConfig::default().armor
}

impl Player {
    pub fn new(config: &PlayerConfig, pos: Pos) -> Self {
        Self {
            name: config.name.clone(),
            pos,
            hp: config.max_hp,
            max_hp: config.max_hp,
            attack: config.attack,
            armor: config.armor,
            items: Vec::new(),
            resources: Resources::new(),
            effects: StatusEffects::new(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Lose HP, never going below zero. Returns the new HP.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.hp = (self.hp - amount.max(0)).max(0);
        self.hp
    }

    /// Restore HP up to the maximum. Returns the HP actually gained.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    pub fn has_item(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    pub fn count_item(&self, item: Item) -> u32 {
        self.items.iter().filter(|i| **i == item).count() as u32
    }

    pub fn give_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove one copy of an item. Returns false if none was carried.
    pub fn take_item(&mut self, item: Item) -> bool {
        match self.items.iter().position(|i| *i == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Full recovery at the given spot: max HP and no lingering effects
    pub fn revive_at(&mut self, pos: Pos) {
        self.hp = self.max_hp;
        self.pos = pos;
        self.effects.clear();
    }

    /// Clamp loaded values back into a consistent range
    pub fn normalize(&mut self) {
        self.max_hp = self.max_hp.max(1);
        self.hp = self.hp.clamp(0, self.max_hp);
        if self.hp == 0 {
            self.hp = self.max_hp;
        }
        self.effects.normalize();
    }
}
