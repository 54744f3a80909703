//! Game configuration: the balancing table
//!
//! Every tunable number lives here or in a table owned by the module that
//! uses it (creature stats, item catalog, quests). `Default` reproduces the
//! shipped balance; a TOML file only needs to name what it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::actions::building::BuildConfig;
use crate::actions::crafting::CraftCatalog;
use crate::actions::gathering::GatheringConfig;
use crate::combat::constants::{CombatConfig, ZombieConfig};
use crate::core::error::{GameError, Result};
use crate::core::types::{Pos, Rect};
use crate::entity::kinds::{AnimalTable, CreatureSpec, HunterTable, NpcTable, VillagerTable};
use crate::entity::population::PopulationConfig;
use crate::player::quest::QuestSpec;
use crate::player::status::StatusTable;
use crate::player::PlayerConfig;
use crate::simulation::events::WorldEvent;

/// Map layout and fixed places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the curated grid (tiles)
    pub width: i32,
    /// Height of the curated grid (tiles)
    pub height: i32,
    /// Seed used when a snapshot does not carry one
    pub default_seed: u32,
    /// Safe zone: no hostile contact, no enemy spawns
    pub village: Rect,
    /// Where the player wakes up after dying
    pub hospital: Pos,
    /// Portal destination and house plot
    pub home: Pos,
    /// Fog-of-war reveal radius around the player
    pub reveal_radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 26,
            height: 32,
            default_seed: 4242,
            village: Rect::new(Pos::new(2, 4), Pos::new(4, 9)),
            hospital: Pos::new(2, 5),
            home: Pos::new(3, 9),
            reveal_radius: 3,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub gathering: GatheringConfig,
    pub build: BuildConfig,
    pub zombie: ZombieConfig,
    pub combat: CombatConfig,
    pub status: StatusTable,
    pub population: PopulationConfig,
    pub animals: AnimalTable,
    pub npcs: NpcTable,
    pub villagers: VillagerTable,
    pub hunters: HunterTable,
    pub events: Vec<WorldEvent>,
    pub quests: Vec<QuestSpec>,
    pub catalog: CraftCatalog,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            gathering: GatheringConfig::default(),
            build: BuildConfig::default(),
            zombie: ZombieConfig::default(),
            combat: CombatConfig::default(),
            status: StatusTable::default(),
            population: PopulationConfig::default(),
            animals: AnimalTable::default(),
            npcs: NpcTable::default(),
            villagers: VillagerTable::default(),
            hunters: HunterTable::default(),
            events: WorldEvent::defaults(),
            quests: QuestSpec::defaults(),
            catalog: CraftCatalog::with_defaults(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) TOML document over the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Replace the crafting catalog with one read from its own TOML file
    pub fn with_catalog_file(mut self, path: &Path) -> Result<Self> {
        self.catalog = CraftCatalog::load_from_toml(path)?;
        self.validate()?;
        tracing::info!(path = %path.display(), items = self.catalog.all().len(), "catalog loaded");
        Ok(self)
    }

    pub fn quest(&self, id: &str) -> Option<&QuestSpec> {
        self.quests.iter().find(|q| q.id == id)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let w = &self.world;
        if w.width < 1 || w.height < 1 {
            return invalid("world size must be at least 1x1");
        }
        let grid = Rect::new(Pos::new(1, 1), Pos::new(w.width, w.height));
        if !grid.contains(w.village.min) || !grid.contains(w.village.max) {
            return invalid("village must lie inside the grid");
        }
        if !w.village.contains(w.hospital) {
            return invalid("hospital must lie inside the village");
        }
        if !grid.contains(w.home) {
            return invalid("home must lie inside the grid");
        }
        if w.reveal_radius < 0 {
            return invalid("reveal_radius must not be negative");
        }
        if self.player.max_hp < 1 {
            return invalid("player max_hp must be positive");
        }

        let g = &self.gathering;
        check_chance("gathering.herb_chance", g.herb_chance)?;
        check_range("gathering.fish_yield", g.fish_yield)?;
        check_range("gathering.hunt_yield", g.hunt_yield)?;

        let z = &self.zombie;
        check_chance("zombie.accuracy", z.accuracy)?;
        check_chance("zombie.item_chance", z.item_chance)?;
        check_range("zombie.damage", z.damage)?;
        check_range("zombie.gold", z.gold)?;
        if z.hp < 1 {
            return invalid("zombie hp must be positive");
        }

        let c = &self.combat;
        check_chance("combat.run_chance", c.run_chance)?;
        check_chance("combat.luck_dodge_chance", c.luck_dodge_chance)?;
        check_chance("status.fear_miss_chance", self.status.fear_miss_chance)?;
        if !(0.0..=1.0).contains(&c.defend_factor) {
            return invalid("combat.defend_factor must be within [0, 1]");
        }

        let p = &self.population;
        check_chance("population.animal_move_chance", p.animal_move_chance)?;
        check_chance("population.npc_move_chance", p.npc_move_chance)?;
        check_chance("population.hunter_move_chance", p.hunter_move_chance)?;
        check_chance("population.villager_move_chance", p.villager_move_chance)?;
        check_range("population.daily_animals", p.daily_animals)?;
        check_range("population.hunter_count", p.hunter_count)?;

        for kind in crate::entity::kinds::AnimalKind::ALL {
            check_creature(self.animals.spec(kind))?;
        }
        for kind in crate::entity::kinds::NpcKind::ALL {
            check_creature(self.npcs.spec(kind))?;
        }

        for event in &self.events {
            if event.weight < 0.0 {
                return invalid(&format!("event weight must not be negative: {}", event.text));
            }
            if let Some(gold) = event.gold {
                check_range("event gold", gold)?;
            }
        }
        Ok(())
    }
}

fn invalid<T>(msg: &str) -> Result<T> {
    Err(GameError::InvalidConfig(msg.to_string()))
}

fn check_chance(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        invalid(&format!("{} must be a probability, got {}", name, p))
    }
}

fn check_range(name: &str, (lo, hi): (u32, u32)) -> Result<()> {
    if lo <= hi {
        Ok(())
    } else {
        invalid(&format!("{} range is inverted: {}..={}", name, lo, hi))
    }
}

fn check_creature(spec: &CreatureSpec) -> Result<()> {
    if spec.hp < 1 {
        return invalid(&format!("{} needs positive hp", spec.name));
    }
    check_chance(&spec.name, spec.dodge_chance)?;
    check_chance(&spec.name, spec.spawn_chance)?;
    check_chance(&spec.name, spec.daily_spawn_chance)?;
    check_chance(&spec.name, spec.loot.special_chance)?;
    check_range(&spec.name, spec.loot.gold)?;
    check_range(&spec.name, spec.loot.food)?;
    for (_, chance) in &spec.on_hit {
        check_chance(&spec.name, *chance)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.width, 26);
        assert_eq!(config.world.height, 32);
        assert_eq!(config.zombie.respawn_days, 5);
        assert_eq!(config.quests.len(), 4);
        assert_eq!(config.events.len(), 9);
    }

    #[test]
    fn test_partial_toml_overrides_defaults() {
        let toml = r#"
            [zombie]
            hp = 9

            [world]
            reveal_radius = 5
        "#;
        let config = GameConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.zombie.hp, 9);
        assert_eq!(config.zombie.respawn_days, 5);
        assert_eq!(config.world.reveal_radius, 5);
        assert_eq!(config.world.width, 26);
    }

    #[test]
    fn test_catalog_file_replaces_the_recipes() {
        let path = std::env::temp_dir().join(format!("tilequest-catalog-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
                [[items]]
                item = "axe"
                name = "Stone axe"
                category = "tool"
                cost = { stone = 4 }
            "#,
        )
        .unwrap();
        let config = GameConfig::default().with_catalog_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.catalog.all().len(), 1);
        let axe = config.catalog.get(crate::actions::crafting::Item::Axe).unwrap();
        assert_eq!(axe.name, "Stone axe");

        let missing = GameConfig::default().with_catalog_file(&path);
        assert!(matches!(missing, Err(GameError::IoError(_))));
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let toml = r#"
            [combat]
            run_chance = 1.5
        "#;
        assert!(matches!(
            GameConfig::from_toml_str(toml),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_hospital_outside_village_rejected() {
        let mut config = GameConfig::default();
        config.world.hospital = Pos::new(20, 20);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(matches!(
            GameConfig::from_toml_str("[zombie\nhp = "),
            Err(GameError::TomlError(_))
        ));
    }
}
