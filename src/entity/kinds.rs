//! Actor kinds and their balancing tables
//!
//! Each table is a plain struct with one field per kind so lookups are
//! deterministic and a TOML file can override a single creature.

use serde::{Deserialize, Serialize};

use crate::player::status::StatusKind;
use crate::world::tile::Tile;

const FOREST: [Tile; 3] = [Tile::Tree, Tile::Pine, Tile::Grass];
const WOODLAND: [Tile; 4] = [Tile::Tree, Tile::Pine, Tile::Grass, Tile::Stump];
const HIGHLAND: [Tile; 3] = [Tile::Peak, Tile::Rock, Tile::Cliff];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalKind {
    Rabbit,
    Deer,
    Boar,
    Wolf,
    Eagle,
}

impl AnimalKind {
    pub const ALL: [AnimalKind; 5] = [
        AnimalKind::Rabbit,
        AnimalKind::Deer,
        AnimalKind::Boar,
        AnimalKind::Wolf,
        AnimalKind::Eagle,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcKind {
    DarkElf,
    InfectedFarmer,
    MadMage,
}

impl NpcKind {
    pub const ALL: [NpcKind; 3] = [NpcKind::DarkElf, NpcKind::InfectedFarmer, NpcKind::MadMage];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VillagerKind {
    QuestMaster,
    Trader,
    Hobbit,
    Herbalist,
    Merchant,
}

impl VillagerKind {
    pub const ALL: [VillagerKind; 5] = [
        VillagerKind::QuestMaster,
        VillagerKind::Trader,
        VillagerKind::Hobbit,
        VillagerKind::Herbalist,
        VillagerKind::Merchant,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HunterKind {
    Hunter,
    Forester,
    Huntress,
}

impl HunterKind {
    pub const ALL: [HunterKind; 3] = [HunterKind::Hunter, HunterKind::Forester, HunterKind::Huntress];
}

/// Loot dropped when a creature is slain
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LootTable {
    /// Inclusive gold range
    pub gold: (u32, u32),
    /// Inclusive food range
    pub food: (u32, u32),
    /// Chance of one item from the special loot list
    pub special_chance: f64,
}

/// Stats and behaviour of an animal or hostile NPC kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureSpec {
    pub name: String,
    pub symbol: String,
    /// Tiles the creature may spawn on and move across
    pub tiles: Vec<Tile>,
    pub hp: i32,
    pub attack: i32,
    /// Passive creatures never start a fight
    #[serde(default)]
    pub passive: bool,
    /// The player (and hunters) may hunt it for food
    #[serde(default)]
    pub huntable: bool,
    /// Bosses stay put between days
    #[serde(default)]
    pub boss: bool,
    /// Strikes as soon as combat begins
    #[serde(default)]
    pub attacks_first: bool,
    /// Chance to dodge the player's blow
    #[serde(default)]
    pub dodge_chance: f64,
    /// Chance to appear when the world is created
    #[serde(default = "always")]
    pub spawn_chance: f64,
    /// Chance for one more to appear on each new day
    #[serde(default)]
    pub daily_spawn_chance: f64,
    /// Rabbits keep this many tiles away from the player when they can
    #[serde(default)]
    pub flee_radius: Option<i32>,
    #[serde(default)]
    pub loot: LootTable,
    /// Status effects that may land with each hit
    #[serde(default)]
    pub on_hit: Vec<(StatusKind, f64)>,
}

fn always() -> f64 {
    1.0
}

impl CreatureSpec {
    fn new(name: &str, symbol: &str, tiles: &[Tile], hp: i32, attack: i32) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            tiles: tiles.to_vec(),
            hp,
            attack,
            passive: false,
            huntable: false,
            boss: false,
            attacks_first: false,
            dodge_chance: 0.0,
            spawn_chance: 1.0,
            daily_spawn_chance: 0.0,
            flee_radius: None,
            loot: LootTable::default(),
            on_hit: Vec::new(),
        }
    }

    pub fn is_hostile(&self) -> bool {
        !self.passive
    }

    pub fn likes(&self, tile: Tile) -> bool {
        self.tiles.contains(&tile)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimalTable {
    pub rabbit: CreatureSpec,
    pub deer: CreatureSpec,
    pub boar: CreatureSpec,
    pub wolf: CreatureSpec,
    pub eagle: CreatureSpec,
}

impl AnimalTable {
    pub fn spec(&self, kind: AnimalKind) -> &CreatureSpec {
        match kind {
            AnimalKind::Rabbit => &self.rabbit,
            AnimalKind::Deer => &self.deer,
            AnimalKind::Boar => &self.boar,
            AnimalKind::Wolf => &self.wolf,
            AnimalKind::Eagle => &self.eagle,
        }
    }
}

impl Default for AnimalTable {
    fn default() -> Self {
        let mut rabbit = CreatureSpec::new("Hare", "🐇", &[Tile::Plain, Tile::Grass], 1, 0);
        rabbit.passive = true;
        rabbit.huntable = true;
        rabbit.flee_radius = Some(3);
        rabbit.loot.food = (1, 1);

        let mut deer = CreatureSpec::new("Deer", "🦌", &FOREST, 2, 0);
        deer.passive = true;
        deer.huntable = true;
        deer.loot.food = (1, 2);

        let mut boar = CreatureSpec::new("Boar", "🐗", &FOREST, 2, 1);
        boar.passive = true;
        boar.huntable = true;
        boar.loot.food = (1, 2);

        let mut wolf = CreatureSpec::new("Wolf", "🐺", &FOREST, 8, 2);
        wolf.loot = LootTable {
            gold: (0, 1),
            food: (2, 3),
            special_chance: 0.1,
        };
        wolf.on_hit = vec![(StatusKind::Bleeding, 0.3)];

        let mut eagle = CreatureSpec::new("Eagle", "🦅", &HIGHLAND, 2, 1);
        eagle.loot = LootTable {
            gold: (0, 0),
            food: (1, 1),
            special_chance: 0.05,
        };

        Self {
            rabbit,
            deer,
            boar,
            wolf,
            eagle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcTable {
    pub dark_elf: CreatureSpec,
    pub infected_farmer: CreatureSpec,
    pub mad_mage: CreatureSpec,
}

impl NpcTable {
    pub fn spec(&self, kind: NpcKind) -> &CreatureSpec {
        match kind {
            NpcKind::DarkElf => &self.dark_elf,
            NpcKind::InfectedFarmer => &self.infected_farmer,
            NpcKind::MadMage => &self.mad_mage,
        }
    }
}

impl Default for NpcTable {
    fn default() -> Self {
        let mut dark_elf = CreatureSpec::new("Dark elf", "🧝🏿", &FOREST, 7, 2);
        dark_elf.dodge_chance = 0.2;
        dark_elf.daily_spawn_chance = 0.25;
        dark_elf.loot = LootTable {
            gold: (2, 4),
            food: (0, 0),
            special_chance: 0.2,
        };
        dark_elf.on_hit = vec![(StatusKind::Poison, 0.15)];

        let mut infected_farmer = CreatureSpec::new(
            "Infected farmer",
            "🧑🏾‍🌾",
            &[Tile::Plain, Tile::Wheat, Tile::Stump],
            4,
            1,
        );
        infected_farmer.spawn_chance = 0.6;
        infected_farmer.daily_spawn_chance = 0.6;
        infected_farmer.loot = LootTable {
            gold: (0, 2),
            food: (0, 1),
            special_chance: 0.0,
        };
        infected_farmer.on_hit = vec![(StatusKind::Poison, 0.3)];

        let mut mad_mage = CreatureSpec::new("Mad mage", "🧙🏾‍♀️", &HIGHLAND, 5, 3);
        mad_mage.boss = true;
        mad_mage.attacks_first = true;
        mad_mage.daily_spawn_chance = 0.25;
        mad_mage.loot = LootTable {
            gold: (3, 6),
            food: (0, 0),
            special_chance: 0.25,
        };
        mad_mage.on_hit = vec![(StatusKind::Fear, 0.2)];

        Self {
            dark_elf,
            infected_farmer,
            mad_mage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VillagerRole {
    Quest,
    Trader,
    Resident,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillagerSpec {
    pub name: String,
    pub symbol: String,
    pub role: VillagerRole,
    pub dialog: String,
}

impl VillagerSpec {
    fn new(name: &str, symbol: &str, role: VillagerRole, dialog: &str) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            role,
            dialog: dialog.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VillagerTable {
    pub quest_master: VillagerSpec,
    pub trader: VillagerSpec,
    pub hobbit: VillagerSpec,
    pub herbalist: VillagerSpec,
    pub merchant: VillagerSpec,
}

impl VillagerTable {
    pub fn spec(&self, kind: VillagerKind) -> &VillagerSpec {
        match kind {
            VillagerKind::QuestMaster => &self.quest_master,
            VillagerKind::Trader => &self.trader,
            VillagerKind::Hobbit => &self.hobbit,
            VillagerKind::Herbalist => &self.herbalist,
            VillagerKind::Merchant => &self.merchant,
        }
    }
}

impl Default for VillagerTable {
    fn default() -> Self {
        use VillagerRole::*;
        Self {
            quest_master: VillagerSpec::new(
                "Quest master",
                "🧙‍♂️",
                Quest,
                "Looking for brave souls to run errands. Ready to help?",
            ),
            trader: VillagerSpec::new(
                "Trader",
                "🧑‍🌾",
                Trader,
                "Welcome! Wood and stone, traded for gold.",
            ),
            hobbit: VillagerSpec::new(
                "Hobbit",
                "🧒",
                Resident,
                "Hello, traveller! The village is quiet and safe.",
            ),
            herbalist: VillagerSpec::new(
                "Herbalist",
                "👩‍🌾",
                Trader,
                "Herbs and potions. Come by if you need patching up.",
            ),
            merchant: VillagerSpec::new(
                "Merchant",
                "🧑‍💼",
                Trader,
                "A little of everything for sale. Good hunting!",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunterSpec {
    pub name: String,
    pub symbol: String,
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HunterTable {
    pub hunter: HunterSpec,
    pub forester: HunterSpec,
    pub huntress: HunterSpec,
}

impl HunterTable {
    pub fn spec(&self, kind: HunterKind) -> &HunterSpec {
        match kind {
            HunterKind::Hunter => &self.hunter,
            HunterKind::Forester => &self.forester,
            HunterKind::Huntress => &self.huntress,
        }
    }
}

impl Default for HunterTable {
    fn default() -> Self {
        let spec = |name: &str, symbol: &str| HunterSpec {
            name: name.into(),
            symbol: symbol.into(),
            tiles: WOODLAND.to_vec(),
        };
        Self {
            hunter: spec("Hunter", "👨🏻‍🦱"),
            forester: spec("Forester", "🧔🏻‍♂️"),
            huntress: spec("Huntress", "👩🏻‍🦱"),
        }
    }
}
