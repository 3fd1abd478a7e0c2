//! Tile-space geometry: positions, footprints, axis-aligned rectangles, and
//! cardinal directions.
//!
//! Blueprint positions are entity centers in tile units. A 1x1 entity sits
//! at `n + 0.5`, a 3x3 machine at `n + 0.5`, and a 4x4 machine on a whole
//! number.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A point on the map in tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// This position moved by `(dx, dy)` tiles.
    pub fn offset(&self, dx: f64, dy: f64) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    /// Whether both positions fall on the same tile.
    pub fn same_tile(&self, other: &Position) -> bool {
        self.x.floor() == other.x.floor() && self.y.floor() == other.y.floor()
    }
}

/// The footprint (size) of an entity in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// The rectangle covered by this footprint when centered on `center`.
    pub fn rect_at(&self, center: Position) -> Rect {
        let hw = f64::from(self.width) / 2.0;
        let hh = f64::from(self.height) / 2.0;
        Rect {
            min_x: center.x - hw,
            min_y: center.y - hh,
            max_x: center.x + hw,
            max_y: center.y + hh,
        }
    }

    /// Distance from the center to a corner.
    pub fn half_diagonal(&self) -> f64 {
        (f64::from(self.width).powi(2) + f64::from(self.height).powi(2)).sqrt() / 2.0
    }
}

/// An axis-aligned rectangle in tile space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Grow the rectangle outward by `margin` tiles on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Strict containment of a point (points on the border are outside).
    pub fn contains(&self, p: Position) -> bool {
        p.x > self.min_x && p.x < self.max_x && p.y > self.min_y && p.y < self.max_y
    }
}

/// Cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

/// How a blueprint encodes directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionScheme {
    /// 2.0 blueprints: 16 directions, north = 0, east = 4, south = 8, west = 12.
    #[default]
    Sixteen,
    /// 1.x blueprints: 8 directions, north = 0, east = 2, south = 4, west = 6.
    Eight,
}

impl Direction {
    /// Decode a blueprint direction code. Diagonal codes have no cardinal
    /// equivalent and decode to `None`.
    pub fn from_code(code: u8, scheme: DirectionScheme) -> Option<Direction> {
        let step = match scheme {
            DirectionScheme::Sixteen => 4,
            DirectionScheme::Eight => 2,
        };
        if code % step != 0 {
            return None;
        }
        match code / step {
            0 => Some(Direction::North),
            1 => Some(Direction::East),
            2 => Some(Direction::South),
            3 => Some(Direction::West),
            _ => None,
        }
    }

    /// Unit offset for this direction (y grows southward).
    pub fn offset(&self) -> (f64, f64) {
        match self {
            Direction::North => (0.0, -1.0),
            Direction::East => (1.0, 0.0),
            Direction::South => (0.0, 1.0),
            Direction::West => (-1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
