//! Status effects attached to the player
//!
//! Bleeding and poison deal damage on every clock tick; fear deals none but
//! may cancel the player's blow in combat. Durations count down once per
//! tick and an effect type is never listed twice.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Bleeding,
    Poison,
    Fear,
}

impl StatusKind {
    pub fn icon(self) -> &'static str {
        match self {
            StatusKind::Bleeding => "🩸",
            StatusKind::Poison => "☠️",
            StatusKind::Fear => "😱",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusKind::Bleeding => "bleeding",
            StatusKind::Poison => "poison",
            StatusKind::Fear => "fear",
        }
    }
}

/// Damage per tick and initial duration of one effect type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusSpec {
    pub damage: i32,
    pub duration: u32,
}

/// Balancing table for status effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusTable {
    pub bleeding: StatusSpec,
    pub poison: StatusSpec,
    pub fear: StatusSpec,
    /// Chance that fear cancels the player's attack for a turn
    pub fear_miss_chance: f64,
}

impl StatusTable {
    pub fn spec(&self, kind: StatusKind) -> StatusSpec {
        match kind {
            StatusKind::Bleeding => self.bleeding,
            StatusKind::Poison => self.poison,
            StatusKind::Fear => self.fear,
        }
    }
}

impl Default for StatusTable {
    fn default() -> Self {
        Self {
            bleeding: StatusSpec {
                damage: 1,
                duration: 3,
            },
            poison: StatusSpec {
                damage: 1,
                duration: 2,
            },
            fear: StatusSpec {
                damage: 0,
                duration: 2,
            },
            fear_miss_chance: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub duration: u32,
}

/// Damage dealt by one effect during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDamage {
    pub kind: StatusKind,
    pub damage: i32,
}

/// Active effects, at most one per kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect, extending an existing one to the longer duration
    pub fn apply(&mut self, kind: StatusKind, duration: u32) {
        if duration == 0 {
            return;
        }
        match self.effects.iter_mut().find(|e| e.kind == kind) {
            Some(existing) => existing.duration = existing.duration.max(duration),
            None => self.effects.push(StatusEffect { kind, duration }),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn duration(&self, kind: StatusKind) -> Option<u32> {
        self.effects.iter().find(|e| e.kind == kind).map(|e| e.duration)
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    /// Merge duplicate kinds and drop spent effects (used after loading)
    pub fn normalize(&mut self) {
        let old = std::mem::take(&mut self.effects);
        for e in old {
            self.apply(e.kind, e.duration);
        }
    }

    /// One clock tick: collect damage from each effect, count durations down
    /// and drop the expired ones. The caller applies the damage.
    pub fn tick(&mut self, table: &StatusTable) -> Vec<StatusDamage> {
        let mut damage = Vec::new();
        self.effects.retain_mut(|effect| {
            let spec = table.spec(effect.kind);
            if spec.damage > 0 {
                damage.push(StatusDamage {
                    kind: effect.kind,
                    damage: spec.damage,
                });
            }
            effect.duration = effect.duration.saturating_sub(1);
            effect.duration > 0
        });
        damage
    }
}
