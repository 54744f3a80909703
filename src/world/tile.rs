//! Tile vocabulary and its property table
//!
//! Every coordinate holds exactly one `Tile`. Tiles serialize as their emoji
//! symbol so snapshots stay readable for the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Terrain family a tile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Water,
    Mountain,
    Forest,
    Field,
    Grass,
    Shore,
}

impl Biome {
    /// Cosmetic tile variants drawn for this biome
    pub fn tiles(self) -> &'static [Tile] {
        match self {
            Biome::Grass => &[Tile::Grass],
            Biome::Forest => &[Tile::Tree, Tile::Pine],
            Biome::Field => &[Tile::Wheat, Tile::Stump],
            Biome::Mountain => &[Tile::Peak, Tile::Mountain, Tile::Rock],
            Biome::Water => &[Tile::Water],
            Biome::Shore => &[Tile::Shore],
        }
    }
}

/// What gathering a tile yields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    Wood,
    Stone,
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tile {
    #[serde(rename = "⬜️")]
    Plain,
    #[serde(rename = "🌿")]
    Grass,
    #[serde(rename = "🌳")]
    Tree,
    #[serde(rename = "🌲")]
    Pine,
    #[serde(rename = "🌱")]
    Stump,
    #[serde(rename = "🌾")]
    Wheat,
    #[serde(rename = "🌊")]
    Water,
    #[serde(rename = "🏝️")]
    Shore,
    #[serde(rename = "🗻")]
    Peak,
    #[serde(rename = "🪨")]
    Rock,
    #[serde(rename = "🧱")]
    Cliff,
    #[serde(rename = "🕳️")]
    Pit,
    #[serde(rename = "🗿")]
    Crag,
    #[serde(rename = "⛰️")]
    Mountain,
    #[serde(rename = "🌋")]
    Volcano,
    #[serde(rename = "🏠")]
    House,
    #[serde(rename = "🏡")]
    Home,
    #[serde(rename = "🏚️")]
    Ruin,
    #[serde(rename = "🪧")]
    Sign,
    #[serde(rename = "🏥")]
    Hospital,
    #[serde(rename = "🪦")]
    Grave,
    #[serde(rename = "🧟")]
    Zombie,
    #[serde(rename = "🦌")]
    Deer,
    #[serde(rename = "🐗")]
    Boar,
    #[serde(rename = "🐇")]
    Rabbit,
}

/// Static properties of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileProps {
    pub symbol: &'static str,
    pub name: &'static str,
    /// Impassable without a climbing rope
    pub blocked: bool,
    /// Impassable without a boat
    pub water: bool,
    pub resource: Option<ResourceClass>,
    pub biome: Option<Biome>,
}

const fn props(
    symbol: &'static str,
    name: &'static str,
    blocked: bool,
    water: bool,
    resource: Option<ResourceClass>,
    biome: Option<Biome>,
) -> TileProps {
    TileProps {
        symbol,
        name,
        blocked,
        water,
        resource,
        biome,
    }
}

impl Tile {
    pub const ALL: [Tile; 25] = [
        Tile::Plain,
        Tile::Grass,
        Tile::Tree,
        Tile::Pine,
        Tile::Stump,
        Tile::Wheat,
        Tile::Water,
        Tile::Shore,
        Tile::Peak,
        Tile::Rock,
        Tile::Cliff,
        Tile::Pit,
        Tile::Crag,
        Tile::Mountain,
        Tile::Volcano,
        Tile::House,
        Tile::Home,
        Tile::Ruin,
        Tile::Sign,
        Tile::Hospital,
        Tile::Grave,
        Tile::Zombie,
        Tile::Deer,
        Tile::Boar,
        Tile::Rabbit,
    ];

    /// Tiles a wood chop restores to once the regrowth timer fires
    pub const WOOD_REGROWN: Tile = Tile::Tree;
    pub const WOOD_DEPLETED: Tile = Tile::Stump;
    pub const STONE_REGROWN: Tile = Tile::Peak;
    pub const STONE_DEPLETED: Tile = Tile::Pit;

    pub fn props(self) -> TileProps {
        use Biome as B;
        use ResourceClass as R;
        match self {
            Tile::Plain => props("⬜️", "plain", false, false, None, None),
            Tile::Grass => props("🌿", "grass", false, false, Some(R::Wood), Some(B::Grass)),
            Tile::Tree => props("🌳", "tree", false, false, Some(R::Wood), Some(B::Forest)),
            Tile::Pine => props("🌲", "pine", false, false, Some(R::Wood), Some(B::Forest)),
            Tile::Stump => props("🌱", "sapling", false, false, Some(R::Wood), Some(B::Field)),
            Tile::Wheat => props("🌾", "wheat", false, false, None, Some(B::Field)),
            Tile::Water => props("🌊", "water", false, true, None, Some(B::Water)),
            Tile::Shore => props("🏝️", "shore", false, false, None, Some(B::Shore)),
            Tile::Peak => props("🗻", "peak", false, false, Some(R::Stone), Some(B::Mountain)),
            Tile::Rock => props("🪨", "rock", false, false, Some(R::Stone), Some(B::Mountain)),
            Tile::Cliff => props("🧱", "cliff", false, false, Some(R::Stone), Some(B::Mountain)),
            Tile::Pit => props("🕳️", "pit", false, false, Some(R::Stone), None),
            Tile::Crag => props("🗿", "crag", true, false, None, Some(B::Mountain)),
            Tile::Mountain => props("⛰️", "mountain", true, false, None, Some(B::Mountain)),
            Tile::Volcano => props("🌋", "volcano", true, false, None, Some(B::Mountain)),
            Tile::House => props("🏠", "house", false, false, None, None),
            Tile::Home => props("🏡", "home", false, false, None, None),
            Tile::Ruin => props("🏚️", "ruin", false, false, None, None),
            Tile::Sign => props("🪧", "building plot", false, false, None, None),
            Tile::Hospital => props("🏥", "hospital", false, false, None, None),
            Tile::Grave => props("🪦", "grave", false, false, None, None),
            Tile::Zombie => props("🧟", "zombie", false, false, None, None),
            Tile::Deer => props("🦌", "deer", false, false, Some(R::Game), None),
            Tile::Boar => props("🐗", "boar", false, false, Some(R::Game), None),
            Tile::Rabbit => props("🐇", "rabbit", false, false, Some(R::Game), None),
        }
    }

    pub fn symbol(self) -> &'static str {
        self.props().symbol
    }

    pub fn is_blocked(self) -> bool {
        self.props().blocked
    }

    /// Blocked tiles are all rocky; a rope lets the player climb them
    pub fn is_rocky(self) -> bool {
        self.props().blocked
    }

    pub fn is_water(self) -> bool {
        self.props().water
    }

    /// Terrain roaming actors may stand on
    pub fn is_walkable(self) -> bool {
        !self.is_blocked() && !self.is_water()
    }

    pub fn resource_class(self) -> Option<ResourceClass> {
        self.props().resource
    }

    /// Stage left behind after chopping wood here
    pub fn chopped(self) -> Option<Tile> {
        match self {
            Tile::Tree | Tile::Pine => Some(Tile::Grass),
            Tile::Grass | Tile::Stump => Some(Tile::Stump),
            _ => None,
        }
    }

    /// Stage left behind after quarrying stone here
    pub fn quarried(self) -> Option<Tile> {
        match self {
            Tile::Peak => Some(Tile::Rock),
            Tile::Rock => Some(Tile::Cliff),
            Tile::Cliff | Tile::Pit => Some(Tile::Pit),
            _ => None,
        }
    }

    /// Land that graves (and the ruin) may be stamped on
    pub fn is_open_land(self) -> bool {
        matches!(
            self,
            Tile::Grass | Tile::Wheat | Tile::Stump | Tile::Tree | Tile::Pine
        )
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Tile {
    type Err = String;

    /// Accepts the emoji with or without its variation selector, or the tile name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.trim().trim_end_matches('\u{fe0f}');
        Tile::ALL
            .into_iter()
            .find(|t| {
                let p = t.props();
                p.symbol.trim_end_matches('\u{fe0f}') == bare || p.name.eq_ignore_ascii_case(bare)
            })
            .ok_or_else(|| format!("unknown tile: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_tiles_are_rocky() {
        for tile in Tile::ALL {
            assert_eq!(tile.is_blocked(), tile.is_rocky());
        }
        assert!(Tile::Mountain.is_blocked());
        assert!(!Tile::Peak.is_blocked());
        assert!(Tile::Water.is_water());
        assert!(!Tile::Water.is_walkable());
    }

    #[test]
    fn test_wood_stages() {
        assert_eq!(Tile::Tree.chopped(), Some(Tile::Grass));
        assert_eq!(Tile::Pine.chopped(), Some(Tile::Grass));
        assert_eq!(Tile::Grass.chopped(), Some(Tile::Stump));
        assert_eq!(Tile::Stump.chopped(), Some(Tile::Stump));
        assert_eq!(Tile::Wheat.chopped(), None);
    }

    #[test]
    fn test_stone_stages() {
        assert_eq!(Tile::Peak.quarried(), Some(Tile::Rock));
        assert_eq!(Tile::Rock.quarried(), Some(Tile::Cliff));
        assert_eq!(Tile::Cliff.quarried(), Some(Tile::Pit));
        assert_eq!(Tile::Pit.quarried(), Some(Tile::Pit));
    }

    #[test]
    fn test_symbol_roundtrip_through_serde() {
        let json = serde_json::to_string(&Tile::Shore).unwrap();
        assert_eq!(json, "\"🏝️\"");
        let back: Tile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Tile::Shore);
    }

    #[test]
    fn test_parse_without_variation_selector() {
        assert_eq!("⛰".parse::<Tile>().unwrap(), Tile::Mountain);
        assert_eq!("zombie".parse::<Tile>().unwrap(), Tile::Zombie);
        assert!("🚀".parse::<Tile>().is_err());
    }

    #[test]
    fn test_biome_tiles_carry_their_biome() {
        for biome in [Biome::Forest, Biome::Field, Biome::Mountain, Biome::Water] {
            for tile in biome.tiles() {
                assert_eq!(tile.props().biome, Some(biome));
            }
        }
    }
}
