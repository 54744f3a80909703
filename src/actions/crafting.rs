//! Craftable items and the crafting action
//!
//! The catalog lists every item with its resource cost, combat stats and
//! gathering perks. It ships with built-in defaults and can be replaced from
//! a TOML file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::player::resources::{format_cost, Cost, Resource};
use crate::simulation::history::HistoryEntry;
use crate::simulation::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Item {
    #[serde(rename = "🪓")]
    Axe,
    #[serde(rename = "⛏️")]
    Pickaxe,
    #[serde(rename = "🗡️")]
    Sword,
    #[serde(rename = "⚔️")]
    TwinBlades,
    #[serde(rename = "⚒️")]
    Warhammer,
    #[serde(rename = "🔱")]
    Trident,
    #[serde(rename = "🏹")]
    Bow,
    #[serde(rename = "🛡️")]
    Shield,
    #[serde(rename = "🔰")]
    TowerShield,
    #[serde(rename = "🧥")]
    Armor,
    #[serde(rename = "🪖")]
    Helmet,
    #[serde(rename = "⛵")]
    Boat,
    #[serde(rename = "🧪")]
    Potion,
    #[serde(rename = "🍱")]
    Rations,
    #[serde(rename = "🪢")]
    Rope,
    #[serde(rename = "💍")]
    LuckRing,
    #[serde(rename = "💉")]
    Syringe,
}

impl Item {
    pub const ALL: [Item; 17] = [
        Item::Axe,
        Item::Pickaxe,
        Item::Sword,
        Item::TwinBlades,
        Item::Warhammer,
        Item::Trident,
        Item::Bow,
        Item::Shield,
        Item::TowerShield,
        Item::Armor,
        Item::Helmet,
        Item::Boat,
        Item::Potion,
        Item::Rations,
        Item::Rope,
        Item::LuckRing,
        Item::Syringe,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Item::Axe => "🪓",
            Item::Pickaxe => "⛏️",
            Item::Sword => "🗡️",
            Item::TwinBlades => "⚔️",
            Item::Warhammer => "⚒️",
            Item::Trident => "🔱",
            Item::Bow => "🏹",
            Item::Shield => "🛡️",
            Item::TowerShield => "🔰",
            Item::Armor => "🧥",
            Item::Helmet => "🪖",
            Item::Boat => "⛵",
            Item::Potion => "🧪",
            Item::Rations => "🍱",
            Item::Rope => "🪢",
            Item::LuckRing => "💍",
            Item::Syringe => "💉",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Item::Axe => "axe",
            Item::Pickaxe => "pickaxe",
            Item::Sword => "sword",
            Item::TwinBlades => "twin_blades",
            Item::Warhammer => "warhammer",
            Item::Trident => "trident",
            Item::Bow => "bow",
            Item::Shield => "shield",
            Item::TowerShield => "tower_shield",
            Item::Armor => "armor",
            Item::Helmet => "helmet",
            Item::Boat => "boat",
            Item::Potion => "potion",
            Item::Rations => "rations",
            Item::Rope => "rope",
            Item::LuckRing => "luck_ring",
            Item::Syringe => "syringe",
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Item {
    type Err = GameError;

    /// Accepts the snake_case key or the emoji (variation selector optional)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bare = s.trim().trim_end_matches('\u{fe0f}');
        let key = bare.to_lowercase().replace([' ', '-'], "_");
        Item::ALL
            .into_iter()
            .find(|i| i.key() == key || i.symbol().trim_end_matches('\u{fe0f}') == bare)
            .ok_or_else(|| GameError::UnknownItem(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Tool,
    Weapon,
    Armor,
    Consumable,
    Travel,
    Trinket,
}

/// Passive abilities granted by carrying an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perk {
    /// Cross water tiles
    Sailing,
    /// Cross rocky tiles
    Climbing,
    /// Chance to dodge enemy blows entirely
    Luck,
}

/// Catalog entry for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub item: Item,
    pub name: String,
    pub category: ItemCategory,
    #[serde(default)]
    pub cost: Cost,
    /// Items consumed by the recipe
    #[serde(default)]
    pub item_cost: Vec<(Item, u32)>,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub armor: i32,
    /// Shield armor is suppressed while a two-handed weapon is carried
    #[serde(default)]
    pub shield: bool,
    #[serde(default)]
    pub two_handed: bool,
    /// HP restored when consumed; zero for non-consumables
    #[serde(default)]
    pub heal: i32,
    #[serde(default)]
    pub wood_bonus: u32,
    #[serde(default)]
    pub stone_bonus: u32,
    #[serde(default)]
    pub perk: Option<Perk>,
    /// Loot-only items cannot be crafted
    #[serde(default = "yes")]
    pub craftable: bool,
}

fn yes() -> bool {
    true
}

impl ItemSpec {
    fn new(item: Item, name: &str, category: ItemCategory, cost: Cost) -> Self {
        Self {
            item,
            name: name.into(),
            category,
            cost,
            item_cost: Vec::new(),
            attack: 0,
            armor: 0,
            shield: false,
            two_handed: false,
            heal: 0,
            wood_bonus: 0,
            stone_bonus: 0,
            perk: None,
            craftable: true,
        }
    }

    fn attack(mut self, attack: i32) -> Self {
        self.attack = attack;
        self
    }

    fn armor(mut self, armor: i32) -> Self {
        self.armor = armor;
        self
    }

    fn two_handed(mut self) -> Self {
        self.two_handed = true;
        self
    }

    fn shield(mut self) -> Self {
        self.shield = true;
        self
    }

    fn heal(mut self, heal: i32) -> Self {
        self.heal = heal;
        self
    }

    fn perk(mut self, perk: Perk) -> Self {
        self.perk = Some(perk);
        self
    }

    pub fn is_consumable(&self) -> bool {
        self.heal > 0
    }
}

/// Catalog of all known items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CraftCatalog {
    items: Vec<ItemSpec>,
}

impl Default for CraftCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl CraftCatalog {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Built-in item table
    pub fn with_defaults() -> Self {
        use ItemCategory as C;
        use Resource::*;

        let mut catalog = Self::new();
        let mut axe = ItemSpec::new(Item::Axe, "Axe", C::Tool, vec![(Wood, 2), (Stone, 1)]);
        axe.wood_bonus = 1;
        catalog.add(axe);
        let mut pickaxe = ItemSpec::new(Item::Pickaxe, "Pickaxe", C::Tool, vec![(Wood, 1), (Stone, 2)]);
        pickaxe.stone_bonus = 1;
        catalog.add(pickaxe);

        catalog.add(
            ItemSpec::new(Item::Sword, "Sword", C::Weapon, vec![(Wood, 2), (Stone, 2), (Gold, 1)])
                .attack(2),
        );
        catalog.add(
            ItemSpec::new(Item::TwinBlades, "Twin blades", C::Weapon, vec![(Wood, 4), (Stone, 3), (Gold, 2)])
                .attack(4)
                .two_handed(),
        );
        catalog.add(
            ItemSpec::new(Item::Warhammer, "Warhammer", C::Weapon, vec![(Wood, 3), (Stone, 3), (Gold, 2)])
                .attack(3)
                .two_handed(),
        );
        catalog.add(
            ItemSpec::new(Item::Trident, "Trident", C::Weapon, vec![(Wood, 3), (Stone, 2), (Gold, 3)])
                .attack(4)
                .two_handed(),
        );
        let mut bow = ItemSpec::new(Item::Bow, "Bow", C::Weapon, vec![(Wood, 2), (Stone, 1), (Gold, 1)])
            .attack(2);
        bow.item_cost = vec![(Item::Rope, 1)];
        catalog.add(bow);

        catalog.add(
            ItemSpec::new(Item::Shield, "Shield", C::Armor, vec![(Wood, 2), (Stone, 2)])
                .armor(2)
                .shield(),
        );
        catalog.add(
            ItemSpec::new(Item::TowerShield, "Tower shield", C::Armor, vec![(Wood, 4), (Stone, 4), (Gold, 2)])
                .armor(4)
                .shield(),
        );
        catalog.add(
            ItemSpec::new(Item::Armor, "Armor", C::Armor, vec![(Wood, 4), (Stone, 3), (Gold, 3)]).armor(5),
        );
        catalog.add(
            ItemSpec::new(Item::Helmet, "Helmet", C::Armor, vec![(Wood, 2), (Stone, 2), (Gold, 1)]).armor(3),
        );

        catalog.add(
            ItemSpec::new(Item::Boat, "Boat", C::Travel, vec![(Wood, 3), (Stone, 1)]).perk(Perk::Sailing),
        );
        catalog.add(ItemSpec::new(Item::Rope, "Rope", C::Travel, vec![(Wood, 2)]).perk(Perk::Climbing));
        catalog.add(
            ItemSpec::new(Item::LuckRing, "Luck ring", C::Trinket, vec![(Stone, 1), (Gold, 2)]).perk(Perk::Luck),
        );

        catalog.add(
            ItemSpec::new(Item::Potion, "Potion", C::Consumable, vec![(Herb, 2), (Fish, 1), (Gold, 1)]).heal(2),
        );
        catalog.add(
            ItemSpec::new(Item::Rations, "Rations", C::Consumable, vec![(Food, 2), (Wood, 1)]).heal(2),
        );
        let mut syringe = ItemSpec::new(Item::Syringe, "Syringe", C::Consumable, Vec::new()).heal(3);
        syringe.craftable = false;
        catalog.add(syringe);

        catalog
    }

    /// Add or replace an entry
    pub fn add(&mut self, spec: ItemSpec) {
        match self.items.iter_mut().find(|s| s.item == spec.item) {
            Some(existing) => *existing = spec,
            None => self.items.push(spec),
        }
    }

    pub fn get(&self, item: Item) -> Option<&ItemSpec> {
        self.items.iter().find(|s| s.item == item)
    }

    pub fn all(&self) -> &[ItemSpec] {
        &self.items
    }

    /// Entries the player can craft
    pub fn craftable(&self) -> impl Iterator<Item = &ItemSpec> {
        self.items.iter().filter(|s| s.craftable)
    }

    /// Load the catalog from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a catalog from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let data: TomlCatalog = toml::from_str(content)?;
        let mut catalog = Self::new();
        for entry in data.items {
            catalog.add(entry.into_spec()?);
        }
        Ok(catalog)
    }
}

/// TOML representation of a catalog file
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    items: Vec<TomlItem>,
}

/// TOML representation of a single item
#[derive(Debug, Deserialize)]
struct TomlItem {
    item: String,
    name: String,
    category: ItemCategory,
    #[serde(default)]
    cost: BTreeMap<String, u32>,
    #[serde(default)]
    item_cost: BTreeMap<String, u32>,
    #[serde(default)]
    attack: i32,
    #[serde(default)]
    armor: i32,
    #[serde(default)]
    shield: bool,
    #[serde(default)]
    two_handed: bool,
    #[serde(default)]
    heal: i32,
    #[serde(default)]
    wood_bonus: u32,
    #[serde(default)]
    stone_bonus: u32,
    perk: Option<Perk>,
    #[serde(default = "yes")]
    craftable: bool,
}

impl TomlItem {
    fn into_spec(self) -> Result<ItemSpec> {
        let item_cost = self
            .item_cost
            .into_iter()
            .map(|(name, n)| name.parse::<Item>().map(|i| (i, n)))
            .collect::<Result<Vec<_>>>()?;

        let mut cost = self
            .cost
            .into_iter()
            .map(|(name, n)| name.parse::<Resource>().map(|r| (r, n)))
            .collect::<Result<Vec<_>>>()?;
        cost.sort_by_key(|(r, _)| *r);

        Ok(ItemSpec {
            item: self.item.parse()?,
            name: self.name,
            category: self.category,
            cost,
            item_cost,
            attack: self.attack,
            armor: self.armor,
            shield: self.shield,
            two_handed: self.two_handed,
            heal: self.heal,
            wood_bonus: self.wood_bonus,
            stone_bonus: self.stone_bonus,
            perk: self.perk,
            craftable: self.craftable,
        })
    }
}

/// Craft an item: pay its resource and item costs, then add it to the inventory
pub fn craft(state: &mut GameState, config: &GameConfig, item: Item) -> bool {
    let Some(spec) = config.catalog.get(item).filter(|s| s.craftable) else {
        state.log(HistoryEntry::new(&state.player.name, format!("{} cannot be crafted", item)).gained("❌"));
        return false;
    };

    if !state.player.resources.has_all(&spec.cost) {
        state.log(
            HistoryEntry::new(
                &state.player.name,
                format!("Not enough for {} (needs {})", item, format_cost(&spec.cost)),
            )
            .gained("❌"),
        );
        return false;
    }
    if let Some((needed, count)) = spec
        .item_cost
        .iter()
        .find(|(i, n)| state.player.count_item(*i) < *n)
    {
        state.log(
            HistoryEntry::new(&state.player.name, format!("Needs {}×{} for {}", count, needed, item))
                .gained("❌"),
        );
        return false;
    }

    state.spend(&spec.cost);
    for (used, count) in &spec.item_cost {
        for _ in 0..*count {
            state.player.take_item(*used);
        }
    }
    state.player.give_item(item);
    tracing::debug!(item = item.key(), "crafted");
    state.log(
        HistoryEntry::new(&state.player.name, format!("Crafted {} {}", item, spec.name))
            .gained("✅")
            .map(format!("-{}", format_cost(&spec.cost))),
    );
    true
}
