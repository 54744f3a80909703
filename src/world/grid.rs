//! World grid: fixed tiles plus a sparse overlay beyond the bounds

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Pos, Rect};
use crate::world::generation::{self, GeneratedGrid};
use crate::world::tile::Tile;

/// Mutable world store
///
/// Coordinates inside `1..=width` x `1..=height` read the fixed grid. Anything
/// further east or south reads the overlay first and falls back to the
/// generator, so the world continues without limit in those directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGrid {
    width: i32,
    height: i32,
    seed: u32,
    tiles: Vec<Tile>,
    #[serde(default, with = "overlay_entries")]
    overlay: AHashMap<Pos, Tile>,
}

impl WorldGrid {
    /// Generate a fresh grid. Also returns where graves were placed.
    pub fn generate(width: i32, height: i32, seed: u32, village: Rect) -> (Self, Vec<Pos>) {
        let GeneratedGrid { tiles, graves, .. } =
            generation::generate_grid(width, height, seed, village);
        let grid = Self {
            width,
            height,
            seed,
            tiles,
            overlay: AHashMap::new(),
        };
        (grid, graves)
    }

    /// Grid filled with a single tile, handy for scripted scenarios
    pub fn filled(width: i32, height: i32, seed: u32, tile: Tile) -> Self {
        Self {
            width,
            height,
            seed,
            tiles: vec![tile; (width.max(0) * height.max(0)) as usize],
            overlay: AHashMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 1 && pos.y >= 1 && pos.x <= self.width && pos.y <= self.height
    }

    fn index(&self, pos: Pos) -> usize {
        ((pos.y - 1) * self.width + (pos.x - 1)) as usize
    }

    /// Current tile, or `None` past the world edge (x < 1 or y < 1)
    pub fn get(&self, pos: Pos) -> Option<Tile> {
        if !pos.on_map() {
            return None;
        }
        if self.in_bounds(pos) {
            return self.tiles.get(self.index(pos)).copied();
        }
        Some(
            self.overlay
                .get(&pos)
                .copied()
                .unwrap_or_else(|| generation::tile_at(pos, self.seed)),
        )
    }

    /// Write a tile. Beyond the bounds the write lands in the overlay; past the
    /// world edge it is ignored.
    pub fn set(&mut self, pos: Pos, tile: Tile) {
        if !pos.on_map() {
            return;
        }
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            if let Some(slot) = self.tiles.get_mut(idx) {
                *slot = tile;
            }
        } else {
            self.overlay.insert(pos, tile);
        }
    }

    /// Number of mutated cells beyond the fixed bounds
    pub fn overlay_len(&self) -> usize {
        self.overlay.len()
    }

    /// All positions of the fixed grid holding `tile`, in row order
    pub fn find_all(&self, tile: Tile) -> Vec<Pos> {
        self.positions()
            .filter(|p| self.get(*p) == Some(tile))
            .collect()
    }

    /// Positions of the fixed grid in row order
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width, self.height);
        (1..=h).flat_map(move |y| (1..=w).map(move |x| Pos::new(x, y)))
    }

    /// Rebuild a grid from saved parts, filling any missing cells
    pub fn restore(
        width: i32,
        height: i32,
        seed: u32,
        tiles: Vec<Tile>,
        overlay: AHashMap<Pos, Tile>,
        village: Rect,
    ) -> Self {
        let mut grid = Self {
            width,
            height,
            seed,
            tiles,
            overlay,
        };
        grid.repair(village);
        grid
    }

    /// Snapshots may carry a truncated tile list; pad it back with the cells
    /// this seed generates, so a repaired grid matches a fresh one
    pub fn repair(&mut self, village: Rect) {
        let expected = (self.width.max(0) * self.height.max(0)) as usize;
        self.tiles.truncate(expected);
        if self.tiles.len() == expected {
            return;
        }
        let generated = generation::generate_grid(self.width, self.height, self.seed, village);
        let have = self.tiles.len();
        self.tiles.extend(generated.tiles.into_iter().skip(have));
        tracing::debug!(filled = expected - have, seed = self.seed, "repaired truncated grid");
    }
}

/// Overlay as a sorted entry list so JSON keys stay plain and output is stable
pub(crate) mod overlay_entries {
    use super::*;
    use serde::{Deserializer, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Entry {
        x: i32,
        y: i32,
        tile: Tile,
    }

    pub fn serialize<S: Serializer>(map: &AHashMap<Pos, Tile>, s: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<Entry> = map
            .iter()
            .map(|(p, t)| Entry {
                x: p.x,
                y: p.y,
                tile: *t,
            })
            .collect();
        entries.sort_by_key(|e| (e.y, e.x));
        entries.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<AHashMap<Pos, Tile>, D::Error> {
        let entries = Vec::<Entry>::deserialize(d)?;
        Ok(entries
            .into_iter()
            .map(|e| (Pos::new(e.x, e.y), e.tile))
            .collect())
    }
}
