//! Player resource counters

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::GameError;

/// Countable resources the player carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Wood,
    Stone,
    Gold,
    Food,
    Fish,
    Herb,
    Water,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Wood,
        Resource::Stone,
        Resource::Gold,
        Resource::Food,
        Resource::Fish,
        Resource::Herb,
        Resource::Water,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Resource::Wood => "wood",
            Resource::Stone => "stone",
            Resource::Gold => "gold",
            Resource::Food => "food",
            Resource::Fish => "fish",
            Resource::Herb => "herb",
            Resource::Water => "water",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Resource::Wood => "🪵",
            Resource::Stone => "🪨",
            Resource::Gold => "💰",
            Resource::Food => "🍖",
            Resource::Fish => "🐟",
            Resource::Herb => "🌿",
            Resource::Water => "💧",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.icon())
    }
}

impl FromStr for Resource {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| r.key() == key || r.icon() == s.trim())
            .ok_or_else(|| GameError::InvalidConfig(format!("unknown resource: {}", s)))
    }
}

/// Resource amounts required or spent, e.g. a crafting cost
pub type Cost = Vec<(Resource, u32)>;

/// Render a cost like `🪵2 🪨1`
pub fn format_cost(cost: &[(Resource, u32)]) -> String {
    cost.iter()
        .map(|(r, n)| format!("{}{}", r.icon(), n))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resource counters held by the player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resources {
    counts: AHashMap<Resource, u32>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current amount of a resource
    pub fn get(&self, resource: Resource) -> u32 {
        self.counts.get(&resource).copied().unwrap_or(0)
    }

    pub fn add(&mut self, resource: Resource, amount: u32) {
        *self.counts.entry(resource).or_insert(0) += amount;
    }

    /// Remove up to `amount`, returns amount actually removed
    pub fn remove(&mut self, resource: Resource, amount: u32) -> u32 {
        if let Some(current) = self.counts.get_mut(&resource) {
            let removed = amount.min(*current);
            *current -= removed;
            removed
        } else {
            0
        }
    }

    /// Check if all required amounts are present
    pub fn has_all(&self, requirements: &[(Resource, u32)]) -> bool {
        requirements.iter().all(|(res, amount)| self.get(*res) >= *amount)
    }

    /// Spend all requirements at once, or nothing. Returns true if spent.
    pub fn spend(&mut self, requirements: &[(Resource, u32)]) -> bool {
        if !self.has_all(requirements) {
            return false;
        }
        for (res, amount) in requirements {
            self.remove(*res, *amount);
        }
        true
    }

    /// Non-zero counters in display order
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::ALL
            .into_iter()
            .map(|r| (r, self.get(r)))
            .filter(|(_, n)| *n > 0)
    }
}
