//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::GameError;

/// Unique identifier for roaming actors (animals, NPCs, villagers, hunters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out entity ids in increasing order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        self.next += 1;
        EntityId(self.next)
    }

    /// Make sure future ids never collide with ids already in use
    pub fn reserve_past(&mut self, id: EntityId) {
        self.next = self.next.max(id.0);
    }
}

/// 1-based world coordinate. Anything with x < 1 or y < 1 lies past the world edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Step one tile in a direction
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance
    pub fn distance(self, other: Pos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True when the coordinate is on the world side of the edge
    pub fn on_map(self) -> bool {
        self.x >= 1 && self.y >= 1
    }

    /// The four orthogonal neighbours
    pub fn neighbors4(self) -> impl Iterator<Item = Pos> {
        Direction::ALL.into_iter().map(move |d| self.step(d))
    }

    /// The eight surrounding cells
    pub fn neighbors8(self) -> impl Iterator<Item = Pos> {
        const OFFSETS: [(i32, i32); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];
        OFFSETS
            .into_iter()
            .map(move |(dx, dy)| Pos::new(self.x + dx, self.y + dy))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive rectangle of world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Pos,
    pub max: Pos,
}

impl Rect {
    pub const fn new(min: Pos, max: Pos) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

/// Orthogonal movement direction. North is towards y = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "n" | "north" | "up" => Ok(Direction::North),
            "s" | "south" | "down" => Ok(Direction::South),
            "e" | "east" | "right" => Ok(Direction::East),
            "w" | "west" | "left" => Ok(Direction::West),
            _ => Err(GameError::UnknownDirection(s.to_string())),
        }
    }
}
