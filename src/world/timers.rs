//! Resource regeneration timers
//!
//! A timer restores one tile after a number of days. At most one timer with
//! days left may govern a coordinate; `add` refuses a second one.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::types::Pos;
use crate::world::grid::WorldGrid;
use crate::world::tile::Tile;

/// Why a timer was armed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerReason {
    Wood,
    Stone,
    Hunt,
    Zombie,
    #[default]
    #[serde(other)]
    Regen,
}

/// Pending tile restoration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenTimer {
    pub pos: Pos,
    pub restore: Tile,
    /// Missing in a save means the timer fires on the next rollover
    #[serde(default)]
    pub days_left: u32,
    #[serde(default)]
    pub reason: TimerReason,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerRegistry {
    #[serde(default, deserialize_with = "skip_unreadable")]
    timers: Vec<RegenTimer>,
}

/// Entries without a position or restore tile are dropped instead of failing the load
fn skip_unreadable<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<RegenTimer>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Timer(RegenTimer),
        Unreadable(IgnoredAny),
    }

    let entries = Vec::<Entry>::deserialize(d)?;
    Ok(entries
        .into_iter()
        .filter_map(|e| match e {
            Entry::Timer(t) => Some(t),
            Entry::Unreadable(_) => None,
        })
        .collect())
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer. Returns false when the coordinate already has an active one.
    pub fn add(&mut self, pos: Pos, restore: Tile, days: u32, reason: TimerReason) -> bool {
        if self.has_active(pos) {
            return false;
        }
        self.timers.push(RegenTimer {
            pos,
            restore,
            days_left: days,
            reason,
        });
        true
    }

    pub fn has_active(&self, pos: Pos) -> bool {
        self.timers.iter().any(|t| t.pos == pos && t.days_left > 0)
    }

    pub fn get(&self, pos: Pos) -> Option<&RegenTimer> {
        self.timers.iter().find(|t| t.pos == pos)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegenTimer> {
        self.timers.iter()
    }

    /// One day passes: decrement every timer, restore and drop the ones that
    /// hit zero. Returns the timers that fired, in registry order.
    pub fn tick(&mut self, world: &mut WorldGrid) -> Vec<RegenTimer> {
        let mut fired = Vec::new();
        self.timers.retain_mut(|timer| {
            timer.days_left = timer.days_left.saturating_sub(1);
            if timer.days_left == 0 {
                world.set(timer.pos, timer.restore);
                fired.push(timer.clone());
                false
            } else {
                true
            }
        });
        if !fired.is_empty() {
            tracing::debug!(count = fired.len(), "regen timers fired");
        }
        fired
    }
}
