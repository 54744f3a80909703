//! Procedural world generation
//!
//! Two smoothed value-noise fields (height and moisture) are classified into
//! biomes, then each biome picks one of its tiles with a second hash. The
//! fixed grid additionally runs smoothing, mountain clustering and shore
//! passes before the village and the special tiles are stamped in.
//! Coordinates outside the grid use the raw mapping only, so `tile_at` is a
//! pure function of (position, seed).

use crate::core::types::{Pos, Rect};
use crate::world::tile::{Biome, Tile};

const HEIGHT_CELL: f64 = 10.0;
const MOISTURE_CELL: f64 = 12.0;
const MAX_GRAVES: usize = 3;

/// Village footprint, rows top to bottom, stamped at the village origin
pub const VILLAGE_LAYOUT: [[Tile; 3]; 6] = [
    [Tile::Plain, Tile::House, Tile::Plain],
    [Tile::Hospital, Tile::Plain, Tile::Plain],
    [Tile::Plain, Tile::House, Tile::Plain],
    [Tile::Plain, Tile::House, Tile::Plain],
    [Tile::Plain, Tile::Plain, Tile::Plain],
    [Tile::Plain, Tile::Sign, Tile::Plain],
];

/// Result of generating the fixed grid
#[derive(Debug, Clone)]
pub struct GeneratedGrid {
    pub width: i32,
    pub height: i32,
    /// Row-major, index `(y - 1) * width + (x - 1)`
    pub tiles: Vec<Tile>,
    /// Where graves were stamped
    pub graves: Vec<Pos>,
    pub ruin: Option<Pos>,
}

/// Deterministic coordinate hash in `0..1_000_000`
pub fn hash(seed: u32, x: i32, y: i32) -> u32 {
    let h = (x as u32)
        .wrapping_mul(374_761_393)
        .wrapping_add((y as u32).wrapping_mul(668_265_263))
        .wrapping_add(seed.wrapping_mul(2_246_822_519));
    let h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    (h ^ (h >> 16)) % 1_000_000
}

/// Value noise on a square lattice with smoothstep interpolation, in [0, 1)
fn smooth_noise(x: f64, y: f64, cell: f64, seed: u32) -> f64 {
    let cx = (x / cell).floor();
    let cy = (y / cell).floor();
    let fx = x / cell - cx;
    let fy = y / cell - cy;
    let sx = fx * fx * (3.0 - 2.0 * fx);
    let sy = fy * fy * (3.0 - 2.0 * fy);

    let corner = |dx: i32, dy: i32| {
        let v = hash(seed, cx as i32 + dx, cy as i32 + dy) % 1000;
        v as f64 / 1000.0
    };
    let v00 = corner(0, 0);
    let v10 = corner(1, 0);
    let v01 = corner(0, 1);
    let v11 = corner(1, 1);

    v00 * (1.0 - sx) * (1.0 - sy) + v10 * sx * (1.0 - sy) + v01 * (1.0 - sx) * sy + v11 * sx * sy
}

fn classify(height: f64, moisture: f64) -> Biome {
    if height < 0.25 {
        Biome::Water
    } else if height > 0.82 || (height > 0.72 && moisture < 0.5) {
        Biome::Mountain
    } else if moisture > 0.65 && height > 0.35 {
        Biome::Forest
    } else if moisture < 0.35 && height < 0.65 {
        Biome::Field
    } else if moisture > 0.5 {
        Biome::Forest
    } else {
        Biome::Grass
    }
}

/// Raw (unsmoothed) biome at a coordinate
pub fn biome_at(pos: Pos, seed: u32) -> Biome {
    let height_offset = (hash(seed, 0, 0) % 1000) as f64;
    let moisture_offset = (hash(seed, 1, 0) % 1000) as f64;
    let x = pos.x as f64;
    let y = pos.y as f64;

    let height = smooth_noise(x + height_offset, y + height_offset * 0.7, HEIGHT_CELL, seed);
    let moisture = smooth_noise(
        x + moisture_offset,
        y + moisture_offset * 0.5,
        MOISTURE_CELL,
        seed.wrapping_add(7_919),
    );
    classify(height, moisture)
}

/// Pick a cosmetic tile for a biome
pub fn biome_tile(biome: Biome, pos: Pos, seed: u32) -> Tile {
    let tiles = biome.tiles();
    if tiles.len() == 1 {
        return tiles[0];
    }
    let idx = hash(seed.wrapping_add(1), pos.x, pos.y) as usize % tiles.len();
    tiles[idx]
}

/// Tile for any on-map coordinate using the raw biome mapping
pub fn tile_at(pos: Pos, seed: u32) -> Tile {
    biome_tile(biome_at(pos, seed), pos, seed)
}

/// Biome grid for the fixed area, 1-based coordinates
struct BiomeGrid {
    width: i32,
    height: i32,
    cells: Vec<Biome>,
}

impl BiomeGrid {
    fn raw(width: i32, height: i32, seed: u32) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 1..=height {
            for x in 1..=width {
                cells.push(biome_at(Pos::new(x, y), seed));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    fn contains(&self, pos: Pos) -> bool {
        pos.x >= 1 && pos.y >= 1 && pos.x <= self.width && pos.y <= self.height
    }

    fn index(&self, pos: Pos) -> usize {
        ((pos.y - 1) * self.width + (pos.x - 1)) as usize
    }

    fn get(&self, pos: Pos) -> Biome {
        self.cells[self.index(pos)]
    }

    fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width, self.height);
        (1..=h).flat_map(move |y| (1..=w).map(move |x| Pos::new(x, y)))
    }

    /// Neighbour biome counts in first-seen order
    fn neighbor_counts(&self, pos: Pos) -> Vec<(Biome, u8)> {
        let mut counts: Vec<(Biome, u8)> = Vec::with_capacity(4);
        for n in pos.neighbors8().filter(|n| self.contains(*n)) {
            let b = self.get(n);
            match counts.iter_mut().find(|(c, _)| *c == b) {
                Some((_, count)) => *count += 1,
                None => counts.push((b, 1)),
            }
        }
        counts
    }

    /// A cell with two or fewer like neighbours joins the neighbourhood majority
    fn smooth(&self) -> Self {
        let mut next = self.cells.clone();
        for pos in self.positions() {
            let counts = self.neighbor_counts(pos);
            let own = self.get(pos);
            if count_of(&counts, own) <= 2 {
                if let Some(majority) = majority(&counts) {
                    next[self.index(pos)] = majority;
                }
            }
        }
        Self { cells: next, ..*self }
    }

    /// Lone mountains (at most one mountain neighbour) join their surroundings
    fn cluster_mountains(&self) -> Self {
        let mut next = self.cells.clone();
        for pos in self.positions() {
            if self.get(pos) != Biome::Mountain {
                continue;
            }
            let counts = self.neighbor_counts(pos);
            if count_of(&counts, Biome::Mountain) <= 1 {
                if let Some(majority) = majority(&counts) {
                    if majority != Biome::Mountain {
                        next[self.index(pos)] = majority;
                    }
                }
            }
        }
        Self { cells: next, ..*self }
    }

    /// Land touching water (8-neighbourhood) turns into shore
    fn apply_shore(&self) -> Self {
        let mut next = self.cells.clone();
        for pos in self.positions() {
            if self.get(pos) != Biome::Water {
                continue;
            }
            for n in pos.neighbors8().filter(|n| self.contains(*n)) {
                if !matches!(self.get(n), Biome::Water | Biome::Shore) {
                    next[self.index(n)] = Biome::Shore;
                }
            }
        }
        Self { cells: next, ..*self }
    }
}

fn count_of(counts: &[(Biome, u8)], biome: Biome) -> u8 {
    counts
        .iter()
        .find(|(b, _)| *b == biome)
        .map(|(_, c)| *c)
        .unwrap_or(0)
}

fn majority(counts: &[(Biome, u8)]) -> Option<Biome> {
    let mut best: Option<(Biome, u8)> = None;
    for &(biome, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((biome, count));
        }
    }
    best.map(|(b, _)| b)
}

/// Generate the curated fixed grid for a seed
pub fn generate_grid(width: i32, height: i32, seed: u32, village: Rect) -> GeneratedGrid {
    let biomes = BiomeGrid::raw(width, height, seed)
        .smooth()
        .smooth()
        .cluster_mountains()
        .apply_shore();

    let mut tiles: Vec<Tile> = biomes
        .positions()
        .map(|pos| biome_tile(biomes.get(pos), pos, seed))
        .collect();
    let index = |pos: Pos| ((pos.y - 1) * width + (pos.x - 1)) as usize;
    let in_bounds = |pos: Pos| pos.x >= 1 && pos.y >= 1 && pos.x <= width && pos.y <= height;

    for (row, cells) in VILLAGE_LAYOUT.iter().enumerate() {
        for (col, tile) in cells.iter().enumerate() {
            let pos = Pos::new(village.min.x + col as i32, village.min.y + row as i32);
            if in_bounds(pos) {
                tiles[index(pos)] = *tile;
            }
        }
    }

    let open_land = |tiles: &[Tile], extra: &[Tile]| -> Vec<Pos> {
        biomes
            .positions()
            .filter(|pos| !village.contains(*pos))
            .filter(|pos| {
                let t = tiles[index(*pos)];
                t.is_open_land() || extra.contains(&t)
            })
            .collect()
    };

    let mut graves = Vec::new();
    let candidates = open_land(&tiles, &[]);
    let grave_count = MAX_GRAVES.min(candidates.len() / 4);
    for i in 0..grave_count {
        let pick = candidates[hash(seed.wrapping_add(100), i as i32, 0) as usize % candidates.len()];
        if tiles[index(pick)] != Tile::Grave {
            tiles[index(pick)] = Tile::Grave;
            graves.push(pick);
        }
    }

    let mut ruin = None;
    let candidates = open_land(&tiles, &[Tile::Shore]);
    if !candidates.is_empty() && hash(seed.wrapping_add(200), 0, 0) % 5 == 0 {
        let pick = candidates[hash(seed.wrapping_add(201), 0, 0) as usize % candidates.len()];
        tiles[index(pick)] = Tile::Ruin;
        ruin = Some(pick);
    }

    GeneratedGrid {
        width,
        height,
        tiles,
        graves,
        ruin,
    }
}
